//! Integration tests for the command crate's shared state

use std::sync::Arc;

use firetail_commands::{all_commands, BotContext, PrefixStore};
use firetail_common::{EsiClient, EsiClientConfig, ExitCode};
use firetail_config::Config;
use tokio::sync::watch;

fn test_config() -> Config {
    let mut config = Config::default();
    config.discord.token = "MTA4NjQ2.X2ZhYmM.dGVzdHRva2Vu".to_string();
    config.discord.owner_id = 100;
    config.discord.co_owner_ids = vec![200];
    config
}

fn test_context(dir: &tempfile::TempDir) -> (BotContext, watch::Receiver<ExitCode>) {
    let esi = EsiClient::new(EsiClientConfig::default()).expect("esi client");
    let prefixes =
        Arc::new(PrefixStore::open(dir.path().join("db"), 1000).expect("prefix store"));
    let (tx, rx) = watch::channel(ExitCode::Critical);
    let context = BotContext::new(Arc::new(test_config()), esi, prefixes, tx);
    (context, rx)
}

#[tokio::test]
async fn unregistered_guild_uses_default_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (context, _rx) = test_context(&dir);

    assert_eq!(context.effective_prefix(Some(123456)), "!");
    assert_eq!(context.effective_prefix(None), "!");
}

#[tokio::test]
async fn registered_guild_uses_its_own_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (context, _rx) = test_context(&dir);

    context
        .prefixes
        .set(123456, "f!")
        .await
        .expect("set prefix");

    assert_eq!(context.effective_prefix(Some(123456)), "f!");
    // Other guilds still fall back
    assert_eq!(context.effective_prefix(Some(654321)), "!");
}

#[tokio::test]
async fn clearing_a_prefix_restores_the_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (context, _rx) = test_context(&dir);

    context.prefixes.set(42, "?").await.expect("set prefix");
    assert_eq!(context.effective_prefix(Some(42)), "?");

    context.prefixes.clear(42).await.expect("clear prefix");
    assert_eq!(context.effective_prefix(Some(42)), "!");
}

#[tokio::test]
async fn owners_and_co_owners_are_recognized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (context, _rx) = test_context(&dir);

    assert!(context.is_owner(100.into()));
    assert!(context.is_owner(200.into()));
    assert!(!context.is_owner(300.into()));
}

#[tokio::test]
async fn exit_signal_reaches_the_lifecycle_receiver() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (context, mut rx) = test_context(&dir);

    context.signal_exit(ExitCode::Restart);

    rx.changed().await.expect("signal");
    assert_eq!(*rx.borrow(), ExitCode::Restart);
}

#[test]
fn all_commands_are_registered() {
    let commands = all_commands();
    let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();

    for expected in [
        "about",
        "uptime",
        "restart",
        "shutdown",
        "character",
        "status",
        "prefix",
        "time",
    ] {
        assert!(names.contains(&expected), "missing command {expected}");
    }
}
