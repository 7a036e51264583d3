//! About and uptime commands

use chrono::Utc;

use crate::context::{make_embed, send_embed, CommandError, Context};

/// OAuth invite URL for the bot with the configured permission bitset
pub fn invite_url(client_id: u64, permissions: u64) -> String {
    format!(
        "https://discord.com/api/oauth2/authorize?client_id={}&permissions={}&scope=bot%20applications.commands",
        client_id, permissions
    )
}

/// Shows information about the bot.
#[poise::command(slash_command, prefix_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), CommandError> {
    let data = ctx.data();
    let uptime = data.counters.uptime_string(Utc::now());

    let (bot_id, guild_count) = {
        let cache = ctx.cache();
        (cache.current_user().id, cache.guilds().len())
    };
    let invite = invite_url(bot_id.get(), data.config.discord.bot_permissions);

    let embed = make_embed()
        .title("Firetail")
        .description("EVE Online community utilities for Discord.")
        .field("Uptime", uptime, true)
        .field("Guilds", guild_count.to_string(), true)
        .field("Messages Seen", data.counters.messages_read().to_string(), true)
        .field(
            "Commands Processed",
            data.counters.commands_processed().to_string(),
            true,
        )
        .field(
            "Sessions Resumed",
            data.counters.sessions_resumed().to_string(),
            true,
        )
        .field("Custom Prefixes", data.prefixes.len().to_string(), true)
        .field("Invite", format!("[Add Firetail]({})", invite), false);

    send_embed(ctx, embed).await
}

/// Shows how long the bot has been running.
#[poise::command(slash_command, prefix_command)]
pub async fn uptime(ctx: Context<'_>) -> Result<(), CommandError> {
    let uptime = ctx.data().counters.uptime_string(Utc::now());
    ctx.say(format!("Uptime: {}", uptime)).await?;
    Ok(())
}
