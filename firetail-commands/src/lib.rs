//! # Firetail Commands
//!
//! Discord command implementations for the Firetail bot, along with the
//! shared command context, guild-prefix store, cooldown guard, and lifetime
//! event counters.

pub mod about;
pub mod admin;
pub mod context;
pub mod cooldown;
pub mod counters;
pub mod esi_lookup;
pub mod prefix;
pub mod prefix_store;
pub mod time;

pub use context::{BotContext, CommandError, Context};
pub use cooldown::{CooldownConfig, CooldownError, CooldownGuard};
pub use counters::EventCounters;
pub use prefix_store::PrefixStore;

/// All commands registered with the framework
pub fn all_commands() -> Vec<poise::Command<BotContext, CommandError>> {
    vec![
        about::about(),
        about::uptime(),
        admin::restart(),
        admin::shutdown(),
        esi_lookup::character(),
        esi_lookup::status(),
        prefix::prefix(),
        time::time(),
    ]
}
