//! Shared command context and framework integration

use std::collections::HashSet;
use std::sync::Arc;

use firetail_common::{EsiClient, ExitCode};
use firetail_config::Config;
use poise::serenity_prelude as serenity;
use tokio::sync::watch;
use tracing::warn;

use crate::{CooldownConfig, CooldownGuard, EventCounters, PrefixStore};

/// Embed accent colour used across all Firetail embeds
pub const EMBED_COLOUR: u32 = 0x1B6F9C;

/// Shared application state accessible across commands and event handlers
pub struct BotContext {
    /// Application configuration
    pub config: Arc<Config>,
    /// ESI API client
    pub esi: EsiClient,
    /// Guild prefix store
    pub prefixes: Arc<PrefixStore>,
    /// Anti-spam cooldown guard
    pub cooldowns: CooldownGuard,
    /// Lifetime event counters
    pub counters: EventCounters,
    /// Exit-mode signal consumed by the bot lifecycle
    shutdown: watch::Sender<ExitCode>,
    /// Owner and co-owner user IDs
    owners: HashSet<u64>,
}

impl BotContext {
    /// Create the shared context from loaded configuration and components
    pub fn new(
        config: Arc<Config>,
        esi: EsiClient,
        prefixes: Arc<PrefixStore>,
        shutdown: watch::Sender<ExitCode>,
    ) -> Self {
        let mut owners = HashSet::new();
        owners.insert(config.discord.owner_id);
        owners.extend(config.discord.co_owner_ids.iter().copied());

        let cooldowns = CooldownGuard::new(CooldownConfig::from_settings(&config.discord));

        Self {
            config,
            esi,
            prefixes,
            cooldowns,
            counters: EventCounters::new(),
            shutdown,
            owners,
        }
    }

    /// Whether a user is the owner or a co-owner
    pub fn is_owner(&self, user_id: serenity::UserId) -> bool {
        self.owners.contains(&user_id.get())
    }

    /// Owner and co-owner IDs, for framework registration
    pub fn owner_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.owners.iter().copied()
    }

    /// The prefix in effect for a guild (or for DMs when `None`)
    pub fn effective_prefix(&self, guild_id: Option<u64>) -> String {
        guild_id
            .and_then(|id| self.prefixes.resolve(id))
            .unwrap_or_else(|| self.config.discord.default_prefix.clone())
    }

    /// Signal the lifecycle task to tear the gateway down with the given mode
    pub fn signal_exit(&self, mode: ExitCode) {
        if self.shutdown.send(mode).is_err() {
            warn!("Exit signal had no receiver; lifecycle task is gone");
        }
    }
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("config", &"<Config>")
            .field("esi", &"<EsiClient>")
            .field("prefixes", &self.prefixes.len())
            .field("owners", &self.owners.len())
            .finish()
    }
}

/// Error type for commands
pub type CommandError = Box<dyn std::error::Error + Send + Sync>;

/// Poise context type alias
pub type Context<'a> = poise::Context<'a, BotContext, CommandError>;

/// Standard embed base: accent colour plus the Firetail footer
pub fn make_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .colour(EMBED_COLOUR)
        .footer(serenity::CreateEmbedFooter::new("Provided via Firetail"))
}

/// Deliver an embed, honoring the `dm_only` and `delete_commands` settings
pub async fn send_embed(ctx: Context<'_>, embed: serenity::CreateEmbed) -> Result<(), CommandError> {
    let discord = &ctx.data().config.discord;

    if discord.dm_only {
        let dm = serenity::CreateMessage::new().embed(embed);
        ctx.author()
            .direct_message(ctx.serenity_context(), dm)
            .await?;
        // Slash invocations still need an acknowledgement in-channel
        if matches!(ctx, poise::Context::Application(_)) {
            ctx.send(
                poise::CreateReply::default()
                    .content("Sent you a DM.")
                    .ephemeral(true),
            )
            .await?;
        }
    } else {
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
    }

    if discord.delete_commands {
        if let poise::Context::Prefix(prefix_ctx) = ctx {
            if let Err(e) = prefix_ctx.msg.delete(ctx.serenity_context()).await {
                warn!("Failed to delete invoking message: {}", e);
            }
        }
    }

    Ok(())
}
