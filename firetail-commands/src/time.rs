//! Time command: current time across the community's timezones

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::context::{make_embed, send_embed, CommandError, Context};

/// Display label → timezone table, in presentation order
///
/// EVE's in-game clock is UTC, so it leads; the rest are the community's
/// home timezones.
pub const TIMEZONES: &[(&str, Tz)] = &[
    ("EVE Time", chrono_tz::UTC),
    ("SA", chrono_tz::Australia::Adelaide),
    ("VIC", chrono_tz::Australia::Melbourne),
    ("NSW", chrono_tz::Australia::Sydney),
    ("QLD", chrono_tz::Australia::Brisbane),
    ("WA", chrono_tz::Australia::Perth),
    ("TAS", chrono_tz::Australia::Hobart),
    ("Salem, MA", chrono_tz::America::New_York),
];

/// The lore year: YC counts from 1898 in the reference timezone
pub fn eve_year(now: DateTime<Utc>) -> String {
    let adelaide_year = now.with_timezone(&chrono_tz::Australia::Adelaide).year();
    format!("YC{}", adelaide_year - 1898)
}

/// Render the (label, time) rows shown by the time command
///
/// Pure function of the instant, in the fixed order of [`TIMEZONES`].
pub fn render_rows(now: DateTime<Utc>) -> Vec<(String, String)> {
    let year = eve_year(now);
    TIMEZONES
        .iter()
        .map(|(label, zone)| {
            let local = now.with_timezone(zone);
            (
                format!("**{}**", label),
                format!("`{}{}`", local.format("%a %b %d %H:%M "), year),
            )
        })
        .collect()
}

/// Shows the time in a range of timezones.
#[poise::command(slash_command, prefix_command)]
pub async fn time(ctx: Context<'_>) -> Result<(), CommandError> {
    info!("{} requested time info", ctx.author().name);

    let rows = render_rows(Utc::now());
    let (labels, times): (Vec<_>, Vec<_>) = rows.into_iter().unzip();

    let embed = make_embed()
        .field("Time Zones", labels.join("\n"), true)
        .field("Time", times.join("\n"), true);

    send_embed(ctx, embed).await
}
