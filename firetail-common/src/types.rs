//! Shared types used across the Firetail workspace

use chrono::{DateTime, Utc};

/// Timestamp type used throughout the application
pub type Timestamp = DateTime<Utc>;

/// How a bot run ended, mapped to the process exit code the launcher
/// script inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Clean shutdown requested by an owner
    Shutdown,
    /// Unexpected failure (startup or gateway)
    Critical,
    /// Restart requested; the launcher starts a fresh process
    Restart,
}

impl ExitCode {
    /// Process exit code for this mode
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Shutdown => 0,
            ExitCode::Critical => 1,
            ExitCode::Restart => 26,
        }
    }

    /// Whether the launcher should start the bot again
    pub fn is_restart(self) -> bool {
        matches!(self, ExitCode::Restart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(ExitCode::Shutdown.code(), 0);
        assert_eq!(ExitCode::Critical.code(), 1);
        assert_eq!(ExitCode::Restart.code(), 26);
    }

    #[test]
    fn test_restart_flag() {
        assert!(ExitCode::Restart.is_restart());
        assert!(!ExitCode::Shutdown.is_restart());
        assert!(!ExitCode::Critical.is_restart());
    }
}
