//! Configuration management for the Firetail Discord bot

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{Config, DatabaseConfig, DiscordConfig, EsiConfig, LoggingSettings};
