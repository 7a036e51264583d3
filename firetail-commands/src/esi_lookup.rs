//! ESI lookup commands: server status and character profiles

use tracing::info;

use crate::context::{make_embed, send_embed, CommandError, Context};

/// Shows the Tranquility server status.
#[poise::command(slash_command, prefix_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), CommandError> {
    info!("{} requested server status", ctx.author().name);
    ctx.defer().await?;

    let status = ctx.data().esi.server_status().await?;

    let mut embed = make_embed()
        .title("Tranquility")
        .field("Players Online", status.players.to_string(), true)
        .field("Server Version", status.server_version.clone(), true)
        .field(
            "Started",
            status.start_time.format("%Y-%m-%d %H:%M UTC").to_string(),
            true,
        );
    if status.vip == Some(true) {
        embed = embed.field("VIP Mode", "Yes", true);
    }

    send_embed(ctx, embed).await
}

/// Looks up a character by name and shows their public profile.
#[poise::command(slash_command, prefix_command)]
pub async fn character(
    ctx: Context<'_>,
    #[description = "Character name"]
    #[rest]
    name: String,
) -> Result<(), CommandError> {
    info!("{} requested character lookup for {:?}", ctx.author().name, name);
    ctx.defer().await?;

    let esi = &ctx.data().esi;

    let resolved = esi.resolve_names(&[name.clone()]).await?;
    let Some(hit) = resolved.first_character() else {
        ctx.say(format!("No character named `{}` found.", name))
            .await?;
        return Ok(());
    };

    let info = esi.character(hit.id).await?;
    let corporation = esi.corporation(info.corporation_id).await?;
    let alliance = match info.alliance_id {
        Some(id) => Some(esi.alliance(id).await?),
        None => None,
    };

    let mut embed = make_embed()
        .title(info.name.clone())
        .field(
            "Corporation",
            format!("{} [{}]", corporation.name, corporation.ticker),
            true,
        );
    if let Some(alliance) = alliance {
        embed = embed.field(
            "Alliance",
            format!("{} <{}>", alliance.name, alliance.ticker),
            true,
        );
    }
    embed = embed
        .field(
            "Security Status",
            format!("{:.2}", info.security_status.unwrap_or(0.0)),
            true,
        )
        .field("Born", info.birthday.format("%Y-%m-%d").to_string(), true);

    send_embed(ctx, embed).await
}
