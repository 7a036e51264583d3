//! Central gateway event handler

use firetail_commands::{BotContext, CommandError};
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Dispatches Discord gateway events: lifetime counters and lifecycle logging
pub async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotContext, CommandError>,
    data: &BotContext,
) -> Result<(), CommandError> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Bot ready event received for: {}", data_about_bot.user.name);
        }
        serenity::FullEvent::Resume { .. } => {
            data.counters.session_resumed();
            info!(
                "Gateway session resumed ({} total)",
                data.counters.sessions_resumed()
            );
        }
        serenity::FullEvent::Message { new_message } => {
            data.counters.message_read();
            debug!(
                "Message seen from {} in channel {}",
                new_message.author.id, new_message.channel_id
            );
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if is_new.unwrap_or(false) {
                info!("Joined guild: {} (ID: {})", guild.name, guild.id);
            } else {
                debug!("Guild available: {} (ID: {})", guild.name, guild.id);
            }
        }
        _ => {}
    }
    Ok(())
}
