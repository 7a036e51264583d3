//! Configuration loading utilities

use crate::Config;
use firetail_common::Result as FiretailResult;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl From<ConfigError> for firetail_common::FiretailError {
    fn from(err: ConfigError) -> Self {
        firetail_common::FiretailError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!("Loading configuration from {:?}", path.as_ref());

        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;

        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables and files
    ///
    /// Resolution order: `FIRETAIL_CONFIG_PATH`, then `config.yaml` /
    /// `config.yml` in the working directory, then built-in defaults. In all
    /// cases environment overrides are applied before validation.
    pub fn load() -> FiretailResult<Config> {
        let config = if let Ok(config_path) = env::var("FIRETAIL_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            info!("No config file found, using defaults with environment overrides");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)
                .map_err(firetail_common::FiretailError::from)?;
            config
                .validate_all()
                .map_err(ConfigError::ValidationError)
                .map_err(firetail_common::FiretailError::from)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FiretailResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // Discord configuration overrides
        if let Ok(token) = env::var("DISCORD_TOKEN") {
            config.discord.token = token;
        }

        if let Ok(prefix) = env::var("FIRETAIL_PREFIX") {
            config.discord.default_prefix = prefix;
        }

        if let Ok(owner) = env::var("FIRETAIL_OWNER_ID") {
            config.discord.owner_id = owner.parse().map_err(|e| ConfigError::EnvParseError {
                var: "FIRETAIL_OWNER_ID".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(co_owners) = env::var("FIRETAIL_CO_OWNERS") {
            let mut ids = Vec::new();
            for part in co_owners.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let id = part.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "FIRETAIL_CO_OWNERS".to_string(),
                    source: Box::new(e),
                })?;
                ids.push(id);
            }
            config.discord.co_owner_ids = ids;
        }

        if let Ok(dm_only) = env::var("FIRETAIL_DM_ONLY") {
            config.discord.dm_only = dm_only.parse().map_err(|e| ConfigError::EnvParseError {
                var: "FIRETAIL_DM_ONLY".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(delete) = env::var("FIRETAIL_DELETE_COMMANDS") {
            config.discord.delete_commands =
                delete.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "FIRETAIL_DELETE_COMMANDS".to_string(),
                    source: Box::new(e),
                })?;
        }

        // ESI configuration overrides
        if let Ok(url) = env::var("ESI_BASE_URL") {
            config.esi.base_url = url;
        }

        if let Ok(datasource) = env::var("ESI_DATASOURCE") {
            config.esi.datasource = datasource;
        }

        // Database configuration overrides
        if let Ok(path) = env::var("FIRETAIL_DB_PATH") {
            config.database.path = path;
        }

        // Logging configuration overrides
        if let Ok(level) = env::var("FIRETAIL_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
