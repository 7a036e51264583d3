//! Owner-only lifecycle commands

use firetail_common::ExitCode;
use tracing::info;

use crate::context::{CommandError, Context};

/// Shuts the bot down cleanly.
#[poise::command(slash_command, prefix_command, owners_only, hide_in_help)]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), CommandError> {
    info!("Shutdown requested by {}", ctx.author().name);
    ctx.say("Shutting down.").await?;
    ctx.data().signal_exit(ExitCode::Shutdown);
    Ok(())
}

/// Shuts the bot down and asks the launcher to start it again.
#[poise::command(slash_command, prefix_command, owners_only, hide_in_help)]
pub async fn restart(ctx: Context<'_>) -> Result<(), CommandError> {
    info!("Restart requested by {}", ctx.author().name);
    ctx.say("Restarting.").await?;
    ctx.data().signal_exit(ExitCode::Restart);
    Ok(())
}
