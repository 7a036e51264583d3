//! Lifetime event counters
//!
//! Tracks the bot's launch time and the three lifetime metrics reported by
//! the status commands: messages seen, commands processed, and gateway
//! sessions resumed. Counters are incremented from the event dispatch path,
//! so they are plain atomics.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime counters plus the launch timestamp
#[derive(Debug)]
pub struct EventCounters {
    launch_time: DateTime<Utc>,
    messages_read: AtomicU64,
    commands_processed: AtomicU64,
    sessions_resumed: AtomicU64,
}

impl EventCounters {
    /// Create counters stamped with the current launch time
    pub fn new() -> Self {
        Self::with_launch_time(Utc::now())
    }

    /// Create counters with an explicit launch time
    pub fn with_launch_time(launch_time: DateTime<Utc>) -> Self {
        Self {
            launch_time,
            messages_read: AtomicU64::new(0),
            commands_processed: AtomicU64::new(0),
            sessions_resumed: AtomicU64::new(0),
        }
    }

    /// Record one incoming message
    pub fn message_read(&self) {
        self.messages_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed command
    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one resumed gateway session
    pub fn session_resumed(&self) {
        self.sessions_resumed.fetch_add(1, Ordering::Relaxed);
    }

    /// Messages seen since launch
    pub fn messages_read(&self) -> u64 {
        self.messages_read.load(Ordering::Relaxed)
    }

    /// Commands processed since launch
    pub fn commands_processed(&self) -> u64 {
        self.commands_processed.load(Ordering::Relaxed)
    }

    /// Gateway sessions resumed since launch
    pub fn sessions_resumed(&self) -> u64 {
        self.sessions_resumed.load(Ordering::Relaxed)
    }

    /// When this process launched
    pub fn launch_time(&self) -> DateTime<Utc> {
        self.launch_time
    }

    /// Uptime rendered for display, as of `now`
    pub fn uptime_string(&self, now: DateTime<Utc>) -> String {
        format_uptime(now - self.launch_time)
    }
}

impl Default for EventCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an uptime duration in the bot's compact display format
///
/// Units are elided from the left until the first nonzero one, seconds are
/// dropped once days appear, and the hour/minute pair collapses to `h:m`
/// once months appear.
pub fn format_uptime(uptime: Duration) -> String {
    let total_secs = uptime.num_seconds().max(0) as u64;

    let years = total_secs / 31_536_000;
    let mut rem = total_secs % 31_536_000;
    let months = rem / 2_592_000;
    rem %= 2_592_000;
    let days = rem / 86_400;
    rem %= 86_400;
    let hours = rem / 3_600;
    rem %= 3_600;
    let minutes = rem / 60;
    let seconds = rem % 60;

    let year_str = if years >= 1 {
        format!("{}y ", years)
    } else {
        String::new()
    };
    let month_str = if months >= 1 || !year_str.is_empty() {
        format!("{}m ", months)
    } else {
        String::new()
    };
    let day_str = if days >= 1 || !month_str.is_empty() {
        let unit = if month_str.is_empty() { " days" } else { "d" };
        format!("{}{} ", days, unit)
    } else {
        String::new()
    };
    let hour_str = if hours >= 1 || !day_str.is_empty() {
        let unit = if month_str.is_empty() { " hrs" } else { ":" };
        format!("{}{}", hours, unit)
    } else {
        String::new()
    };

    let mins = if month_str.is_empty() {
        format!(" {}", minutes)
    } else {
        minutes.to_string()
    };
    let m_unit = if month_str.is_empty() { " mins" } else { "" };
    let secs = if day_str.is_empty() {
        format!(" {} secs", seconds)
    } else {
        String::new()
    };

    format!("{}{}{}{}{}{}{}", year_str, month_str, day_str, hour_str, mins, m_unit, secs)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let counters = EventCounters::new();
        assert_eq!(counters.messages_read(), 0);

        counters.message_read();
        counters.message_read();
        counters.command_processed();
        counters.session_resumed();

        assert_eq!(counters.messages_read(), 2);
        assert_eq!(counters.commands_processed(), 1);
        assert_eq!(counters.sessions_resumed(), 1);
    }

    #[test]
    fn test_uptime_seconds_only() {
        assert_eq!(format_uptime(Duration::seconds(42)), "0 mins 42 secs");
    }

    #[test]
    fn test_uptime_minutes_and_seconds() {
        assert_eq!(format_uptime(Duration::seconds(90)), "1 mins 30 secs");
    }

    #[test]
    fn test_uptime_hours() {
        assert_eq!(format_uptime(Duration::seconds(3_700)), "1 hrs 1 mins 40 secs");
    }

    #[test]
    fn test_uptime_days_drop_seconds() {
        let uptime = Duration::seconds(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        assert_eq!(format_uptime(uptime), "2 days 3 hrs 4 mins");
    }

    #[test]
    fn test_uptime_months_collapse_units() {
        let uptime = Duration::seconds(35 * 86_400);
        assert_eq!(format_uptime(uptime), "1m 5d 0:0");
    }

    #[test]
    fn test_uptime_years() {
        let uptime = Duration::seconds(365 * 86_400 + 30 * 86_400 + 86_400);
        assert_eq!(format_uptime(uptime), "1y 1m 1d 0:0");
    }

    #[test]
    fn test_negative_uptime_clamps_to_zero() {
        assert_eq!(format_uptime(Duration::seconds(-5)), "0 mins 0 secs");
    }

    #[test]
    fn test_uptime_string_uses_launch_time() {
        let launch = DateTime::parse_from_rfc3339("2026-08-07T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let now = DateTime::parse_from_rfc3339("2026-08-07T12:01:30Z")
            .unwrap()
            .with_timezone(&Utc);

        let counters = EventCounters::with_launch_time(launch);
        assert_eq!(counters.uptime_string(now), "1 mins 30 secs");
    }
}
