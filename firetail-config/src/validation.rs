//! Validation utilities for configuration values

use validator::ValidationError;

/// Validate Discord token format (basic check)
pub fn validate_discord_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() {
        return Err(ValidationError::new("empty_discord_token"));
    }

    // Discord bot tokens typically have a specific format: bot_id.timestamp.signature
    // Basic check for dot-separated structure
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() == 3 && parts.iter().all(|part| !part.is_empty()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_discord_token_format"))
    }
}

/// Validate a command prefix: 1 to 5 characters, no whitespace
///
/// The same rule applies to the configured default and to prefixes chosen
/// per guild at runtime.
pub fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.is_empty() {
        return Err(ValidationError::new("empty_prefix"));
    }

    if prefix.chars().count() > 5 {
        return Err(ValidationError::new("prefix_too_long"));
    }

    if prefix.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("prefix_contains_whitespace"));
    }

    Ok(())
}

/// Validate a log level string
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Check for characters that would cause issues on most filesystems
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_discord_token() {
        // Valid token shapes
        assert!(validate_discord_token("abc.def.ghi").is_ok());
        assert!(validate_discord_token("MTA4NjQ2.X2ZhYmM.dGVzdA").is_ok());

        // Invalid token shapes
        assert!(validate_discord_token("").is_err());
        assert!(validate_discord_token("no-dots-here").is_err());
        assert!(validate_discord_token("two.parts").is_err());
        assert!(validate_discord_token("a..c").is_err());
        assert!(validate_discord_token("a.b.c.d").is_err());
    }

    #[test]
    fn test_validate_prefix() {
        // Valid prefixes
        assert!(validate_prefix("!").is_ok());
        assert!(validate_prefix("?").is_ok());
        assert!(validate_prefix("f!").is_ok());
        assert!(validate_prefix("ft...").is_ok());

        // Invalid prefixes
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("toolong").is_err());
        assert!(validate_prefix("! ").is_err());
        assert!(validate_prefix("a b").is_err());
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("trace").is_ok());
        assert!(validate_log_level("debug").is_ok());
        assert!(validate_log_level("info").is_ok());
        assert!(validate_log_level("warn").is_ok());
        assert!(validate_log_level("error").is_ok());

        assert!(validate_log_level("").is_err());
        assert!(validate_log_level("verbose").is_err());
        assert!(validate_log_level("INFO").is_err());
    }

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("firetail.db").is_ok());
        assert!(validate_file_path("/var/lib/firetail/db").is_ok());
        assert!(validate_file_path("C:\\firetail\\db").is_ok());

        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("bad<path>").is_err());
        assert!(validate_file_path("what?").is_err());
    }
}
