//! Common utilities and types for the Firetail Discord bot

pub mod error;
pub mod esi;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{FiretailError, Result};
pub use esi::{
    AllianceInfo, CharacterInfo, ClientMetrics, CorporationInfo, EsiClient, EsiClientConfig,
    NamedId, ResolvedIds, ServerStatus, SolarSystem,
};
pub use logging::{init_default_logging, init_logging, LoggingConfig};
pub use types::{ExitCode, Timestamp};
