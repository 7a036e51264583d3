//! Firetail - Main Entry Point

use clap::Parser;
use firetail_bot::Firetail;
use firetail_common::{init_logging, ExitCode, LoggingConfig};
use firetail_config::{Config, ConfigLoader};
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> firetail_common::Result<Config> {
    match &args.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(ExitCode::Critical.code());
        }
    };

    let logging = LoggingConfig {
        level: args
            .log_level
            .clone()
            .unwrap_or_else(|| config.logging.level.clone()),
        file_path: config.logging.file.clone(),
        colored: config.logging.colored,
        include_spans: false,
    };
    if let Err(e) = init_logging(logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(ExitCode::Critical.code());
    }

    info!("Starting Firetail");

    let exit = match Firetail::new(config).start().await {
        Ok(mode) => mode,
        Err(e) => {
            error!("Bot terminated with error: {}", e);
            ExitCode::Critical
        }
    };

    if exit.is_restart() {
        info!("Exiting for restart");
    } else {
        info!("Firetail has shut down");
    }

    std::process::exit(exit.code());
}
