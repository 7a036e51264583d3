//! Per-guild command prefix management

use firetail_config::validation::validate_prefix;
use tracing::info;

use crate::context::{CommandError, Context};

/// Manage this guild's command prefix.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    subcommands("show", "set", "clear")
)]
pub async fn prefix(ctx: Context<'_>) -> Result<(), CommandError> {
    // Bare invocation behaves like `prefix show`
    show_current(ctx).await
}

/// Shows the prefix in effect for this guild.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn show(ctx: Context<'_>) -> Result<(), CommandError> {
    show_current(ctx).await
}

async fn show_current(ctx: Context<'_>) -> Result<(), CommandError> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("Prefixes are set per guild; in DMs just use the default prefix or mention me.")
            .await?;
        return Ok(());
    };

    let data = ctx.data();
    let effective = data.effective_prefix(Some(guild_id.get()));
    if data.prefixes.resolve(guild_id.get()).is_some() {
        ctx.say(format!("The prefix for this guild is `{}`.", effective))
            .await?;
    } else {
        ctx.say(format!(
            "This guild uses the default prefix `{}`.",
            effective
        ))
        .await?;
    }
    Ok(())
}

/// Sets this guild's command prefix.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn set(
    ctx: Context<'_>,
    #[description = "New prefix (1-5 characters, no whitespace)"] new_prefix: String,
) -> Result<(), CommandError> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("Prefixes are set per guild; there is nothing to set in a DM.")
            .await?;
        return Ok(());
    };

    if validate_prefix(&new_prefix).is_err() {
        ctx.say("Prefixes must be 1-5 characters with no whitespace.")
            .await?;
        return Ok(());
    }

    ctx.data()
        .prefixes
        .set(guild_id.get(), &new_prefix)
        .await?;
    info!(
        "Prefix for guild {} set to {:?} by {}",
        guild_id,
        new_prefix,
        ctx.author().name
    );

    ctx.say(format!("Prefix for this guild is now `{}`.", new_prefix))
        .await?;
    Ok(())
}

/// Reverts this guild to the default prefix.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn clear(ctx: Context<'_>) -> Result<(), CommandError> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("Prefixes are set per guild; there is nothing to clear in a DM.")
            .await?;
        return Ok(());
    };

    let data = ctx.data();
    let removed = data.prefixes.clear(guild_id.get()).await?;
    let default = &data.config.discord.default_prefix;

    if removed {
        info!("Prefix for guild {} cleared by {}", guild_id, ctx.author().name);
        ctx.say(format!(
            "Prefix cleared; this guild is back on the default `{}`.",
            default
        ))
        .await?;
    } else {
        ctx.say(format!(
            "This guild was already using the default prefix `{}`.",
            default
        ))
        .await?;
    }
    Ok(())
}
