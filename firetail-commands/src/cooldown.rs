//! Anti-spam cooldown guard applied to command usage

use dashmap::DashMap;
use firetail_config::DiscordConfig;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Errors returned when a command is still on cooldown
#[derive(Error, Debug)]
pub enum CooldownError {
    #[error("`{command}` is on cooldown for you, try again in {remaining_seconds}s.")]
    UserOnCooldown {
        command: String,
        remaining_seconds: u64,
    },
    #[error("`{command}` was just used in this channel, try again in {remaining_seconds}s.")]
    ChannelOnCooldown {
        command: String,
        remaining_seconds: u64,
    },
}

/// Cooldown key for tracking different scopes
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CooldownKey {
    /// Per-user cooldown: (command_name, user_id)
    User(String, u64),
    /// Per-channel cooldown: (command_name, channel_id)
    Channel(String, u64),
}

/// Cooldown configuration
#[derive(Debug, Clone)]
pub struct CooldownConfig {
    /// Per-user cooldown duration
    pub user: Option<Duration>,
    /// Per-channel cooldown duration
    pub channel: Option<Duration>,
}

impl CooldownConfig {
    /// Build from the Discord section of the configuration; zero disables
    pub fn from_settings(discord: &DiscordConfig) -> Self {
        let user = (discord.user_cooldown_seconds > 0)
            .then(|| Duration::from_secs(discord.user_cooldown_seconds));
        Self {
            user,
            channel: None,
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            user: Some(Duration::from_secs(3)),
            channel: None,
        }
    }
}

/// Guard tracking recent command usage
#[derive(Debug)]
pub struct CooldownGuard {
    config: CooldownConfig,
    entries: DashMap<CooldownKey, Instant>,
}

impl CooldownGuard {
    /// Create a new guard with the given configuration
    pub fn new(config: CooldownConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
        }
    }

    /// Check whether a command may run, and start its cooldown windows if so
    pub fn check_and_touch(
        &self,
        command: &str,
        user_id: u64,
        channel_id: Option<u64>,
    ) -> Result<(), CooldownError> {
        let now = Instant::now();

        if let (Some(channel_duration), Some(channel_id)) = (self.config.channel, channel_id) {
            let key = CooldownKey::Channel(command.to_string(), channel_id);
            if let Some(last_used) = self.entries.get(&key) {
                let elapsed = now.duration_since(*last_used);
                if elapsed < channel_duration {
                    let remaining = channel_duration - elapsed;
                    return Err(CooldownError::ChannelOnCooldown {
                        command: command.to_string(),
                        remaining_seconds: remaining.as_secs().max(1),
                    });
                }
            }
        }

        if let Some(user_duration) = self.config.user {
            let key = CooldownKey::User(command.to_string(), user_id);
            if let Some(last_used) = self.entries.get(&key) {
                let elapsed = now.duration_since(*last_used);
                if elapsed < user_duration {
                    let remaining = user_duration - elapsed;
                    return Err(CooldownError::UserOnCooldown {
                        command: command.to_string(),
                        remaining_seconds: remaining.as_secs().max(1),
                    });
                }
            }
        }

        debug!("Starting cooldowns for command '{}' (user: {})", command, user_id);

        if self.config.channel.is_some() {
            if let Some(channel_id) = channel_id {
                self.entries
                    .insert(CooldownKey::Channel(command.to_string(), channel_id), now);
            }
        }

        if self.config.user.is_some() {
            self.entries
                .insert(CooldownKey::User(command.to_string(), user_id), now);
        }

        Ok(())
    }

    /// Number of active cooldown entries
    pub fn active_cooldowns(&self) -> usize {
        self.entries.len()
    }

    /// Drop entries old enough that no configured window can still cover them
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        let horizon = [self.config.user, self.config.channel]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(Duration::from_secs(0));

        self.entries
            .retain(|_, last_used| now.duration_since(*last_used) <= horizon);

        debug!("Cleaned up expired cooldowns");
    }
}
