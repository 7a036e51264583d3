//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Discord-related configuration
    #[validate]
    pub discord: DiscordConfig,

    /// ESI-related configuration
    #[validate]
    pub esi: EsiConfig,

    /// Database configuration
    #[validate]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// Discord bot configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscordConfig {
    /// Discord bot token
    #[validate(custom(function = "crate::validation::validate_discord_token", message = "Invalid Discord token format"))]
    pub token: String,

    /// Command prefix used when a guild has not chosen its own
    #[validate(custom(function = "crate::validation::validate_prefix", message = "Prefix must be 1-5 characters with no whitespace"))]
    pub default_prefix: String,

    /// User ID of the bot owner
    #[validate(range(min = 1, message = "Owner ID is required"))]
    pub owner_id: u64,

    /// User IDs of co-owners who share owner-level commands
    pub co_owner_ids: Vec<u64>,

    /// Permission bitset requested in the OAuth invite URL
    pub bot_permissions: u64,

    /// Send command output via DM instead of the invoking channel
    pub dm_only: bool,

    /// Delete the invoking message after responding to a prefix command
    pub delete_commands: bool,

    /// Per-user cooldown applied to commands, in seconds
    #[validate(range(max = 3600, message = "Cooldown cannot exceed one hour"))]
    pub user_cooldown_seconds: u64,

    /// Request timeout in seconds for Discord API calls
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub request_timeout_seconds: u64,
}

/// ESI API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EsiConfig {
    /// ESI base URL
    #[validate(url(message = "ESI base URL must be a valid URL"))]
    pub base_url: String,

    /// ESI datasource (e.g., "tranquility")
    #[validate(length(min = 1, message = "Datasource cannot be empty"))]
    pub datasource: String,

    /// User-Agent sent to ESI
    #[validate(length(min = 1, message = "User agent cannot be empty"))]
    pub user_agent: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Maximum number of retries for transient failures
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,

    /// Rate limit: requests per second
    #[validate(range(min = 1, max = 100, message = "Rate limit must be between 1 and 100"))]
    pub rate_limit_per_sec: u32,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Directory where the embedded database lives
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid database path"))]
    pub path: String,

    /// How often pending writes are flushed to disk, in milliseconds
    #[validate(range(min = 100, max = 60000, message = "Flush interval must be between 100 and 60000 ms"))]
    pub flush_interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use colored console output
    pub colored: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            esi: EsiConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            default_prefix: "!".to_string(),
            owner_id: 0,
            co_owner_ids: Vec::new(),
            bot_permissions: 322_625,
            dm_only: false,
            delete_commands: false,
            user_cooldown_seconds: 3,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for EsiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://esi.evetech.net/latest".to_string(),
            datasource: "tranquility".to_string(),
            user_agent: "firetail-bot".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            rate_limit_per_sec: 10,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "firetail.db".to_string(),
            flush_interval_ms: 1000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            colored: true,
        }
    }
}

impl Config {
    /// Validate the entire configuration tree
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.discord.token = "MTA4NjQ2.X2ZhYmM.dGVzdHRva2Vu".to_string();
        config.discord.owner_id = 120_500_100_000_000_001;
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.discord.default_prefix, "!");
        assert_eq!(config.esi.datasource, "tranquility");
        assert_eq!(config.database.path, "firetail.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.discord.user_cooldown_seconds, 3);
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(valid_config().validate_all().is_ok());
    }

    #[test]
    fn test_empty_token_fails_validation() {
        let config = Config::default();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_bad_prefix_fails_validation() {
        let mut config = valid_config();
        config.discord.default_prefix = "too long".to_string();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_bad_esi_url_fails_validation() {
        let mut config = valid_config();
        config.esi.base_url = "not a url".to_string();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_bad_log_level_fails_validation() {
        let mut config = valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate_all().is_err());
    }
}
