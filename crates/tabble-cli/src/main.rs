mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tabble::{ChatSession, RuntimeConfig};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = RuntimeConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
    }
    if let Some(user_id) = cli.user_id.clone() {
        config.api.user_id = Some(user_id);
    }

    init_logging(&config);
    tracing::debug!("Using backend at {}", config.api.base_url);

    let session = ChatSession::from_config(&config)?;

    match cli.command {
        Command::Threads => commands::list_threads(&session).await,
        Command::New => commands::new_thread(&session).await,
        Command::Chat(args) => commands::chat(&session, args).await,
        Command::History(args) => commands::history(&session, args).await,
        Command::Rename(args) => commands::rename(&session, args).await,
        Command::Archive(args) => commands::archive(&session, args).await,
        Command::Unarchive(args) => commands::unarchive(&session, args).await,
        Command::Delete(args) => commands::delete(&session, args).await,
    }
}

fn init_logging(config: &RuntimeConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so streamed replies stay clean on stdout
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
