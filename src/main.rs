mod config;
mod error;
mod fetcher;
mod formatter;
mod notifier;
mod poller;
mod types;

use std::sync::Mutex;

use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::StatusClient;
use crate::notifier::TelegramBot;
use crate::poller::HomeworkPoller;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{e}. Bot stopped.");
            std::process::exit(1);
        }
    };
    info!(config = ?cfg, "All required environment variables found");

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let api = StatusClient::new(&cfg)?;
    let bot = TelegramBot::new(&cfg)?;
    HomeworkPoller::new(cfg, api, bot).run().await;
    Ok(())
}

/// stdout always; LOG_FILE (truncated on start) when set.
fn init_logging() {
    let file_layer = config::log_file().and_then(|path| match std::fs::File::create(&path) {
        Ok(file) => Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
        Err(e) => {
            eprintln!("Cannot open log file {path}: {e}");
            None
        }
    });

    tracing_subscriber::registry()
        .with(EnvFilter::new(config::log_level()))
        .with(fmt::layer())
        .with(file_layer)
        .init();
}
