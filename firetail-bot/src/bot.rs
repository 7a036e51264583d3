//! Core bot assembly and lifecycle using the Poise framework

use std::collections::HashSet;
use std::sync::Arc;

use firetail_commands::{all_commands, BotContext, CommandError, Context, PrefixStore};
use firetail_common::{EsiClient, EsiClientConfig, ExitCode};
use firetail_config::Config;
use poise::serenity_prelude::{self as serenity, GatewayIntents};
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::{BotError, BotResult};
use crate::events::event_handler;

/// Main bot structure
pub struct Firetail {
    config: Arc<Config>,
}

impl Firetail {
    /// Creates a new bot instance from loaded configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Runs the bot until an exit mode is reached
    ///
    /// Returns how the run ended; `main` maps this to the process exit code.
    pub async fn start(&self) -> BotResult<ExitCode> {
        let config = self.config.clone();

        let esi_config =
            EsiClientConfig::new(config.esi.base_url.as_str(), config.esi.datasource.as_str())
                .with_user_agent(config.esi.user_agent.as_str())
                .with_timeout(config.esi.timeout_seconds)
                .with_rate_limit(config.esi.rate_limit_per_sec)
                .with_max_retries(config.esi.max_retries as usize);
        let esi = EsiClient::new(esi_config)?;

        // Open the prefix store and warm the cache before the gateway
        // connects, so the first incoming message already resolves correctly
        let prefixes = Arc::new(PrefixStore::open(
            &config.database.path,
            config.database.flush_interval_ms,
        )?);
        let loaded = prefixes.load()?;
        info!("Loaded {} guild prefix(es)", loaded);

        let (shutdown_tx, mut shutdown_rx) = watch::channel(ExitCode::Critical);

        let data = BotContext::new(config.clone(), esi, prefixes, shutdown_tx.clone());
        // Serenity ids are non-zero; config validation enforces the owner,
        // but a stray zero in the co-owner list must not panic here
        let owners: HashSet<serenity::UserId> = data
            .owner_ids()
            .filter(|&id| id != 0)
            .map(serenity::UserId::new)
            .collect();

        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: all_commands(),
                owners,
                on_error: |error| Box::pin(on_error(error)),
                command_check: Some(|ctx| Box::pin(global_check(ctx))),
                post_command: |ctx| {
                    Box::pin(async move {
                        ctx.data().counters.command_processed();
                    })
                },
                event_handler: |ctx, event, framework, data| {
                    Box::pin(event_handler(ctx, event, framework, data))
                },
                prefix_options: poise::PrefixFrameworkOptions {
                    dynamic_prefix: Some(|ctx| {
                        Box::pin(async move {
                            let prefix = ctx
                                .data
                                .effective_prefix(ctx.guild_id.map(|guild| guild.get()));
                            Ok(Some(prefix))
                        })
                    }),
                    mention_as_prefix: true,
                    ..Default::default()
                },
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Connected as {} (ID: {})", ready.user.name, ready.user.id);
                    info!("Connected to {} guilds", ready.guilds.len());

                    poise::builtins::register_globally(ctx, &framework.options().commands)
                        .await?;
                    info!("Slash commands registered globally");

                    Ok(data)
                })
            })
            .build();

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = serenity::ClientBuilder::new(&config.discord.token, intents)
            .framework(framework)
            .await
            .map_err(BotError::Discord)?;

        // Tear the gateway down when any exit mode is signalled
        let shard_manager = client.shard_manager.clone();
        let mut signal_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            if signal_rx.changed().await.is_ok() {
                info!("Exit signal received, shutting down shards");
                shard_manager.shutdown_all().await;
            }
        });

        // Ctrl-C folds into the same path as the shutdown command
        let interrupt_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received interrupt, requesting shutdown");
                let _ = interrupt_tx.send(ExitCode::Shutdown);
            }
        });

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            return Ok(ExitCode::Critical);
        }

        let mode = *shutdown_rx.borrow_and_update();
        Ok(mode)
    }
}

/// Global check run before every command: the anti-spam cooldown guard
///
/// Owners and co-owners bypass it.
async fn global_check(ctx: Context<'_>) -> Result<bool, CommandError> {
    let data = ctx.data();

    if data.is_owner(ctx.author().id) {
        return Ok(true);
    }

    let result = data.cooldowns.check_and_touch(
        &ctx.command().qualified_name,
        ctx.author().id.get(),
        Some(ctx.channel_id().get()),
    );

    match result {
        Ok(()) => Ok(true),
        Err(cooldown) => {
            ctx.say(cooldown.to_string()).await?;
            Ok(false)
        }
    }
}

/// Global error handler for the framework
async fn on_error(error: poise::FrameworkError<'_, BotContext, CommandError>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command '{}': {:?}", ctx.command().name, error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(
                "Error in event handler for {:?}: {:?}",
                event.snake_case_name(),
                error
            );
        }
        error => {
            error!("Other error: {:?}", error);
        }
    }
}
