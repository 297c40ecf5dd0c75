//! Main entry point for the translation service CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use translate_client::cli::commands::{self, Commands};
use translate_client::{ArtifactReference, ClientConfig, TranslationClient};

/// Client for a remote translation service
#[derive(Parser, Debug)]
#[command(name = "translate-client", version, about, long_about = None)]
struct Args {
    /// JSON config file (defaults to TRANSLATE_* env vars)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service base URL, e.g. http://localhost:8080
    #[arg(long)]
    base_url: Option<String>,

    /// Session cookie sent with every request, e.g. JSESSIONID=...
    #[arg(long)]
    cookie: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    let default_filter = format!("{}={}", env!("CARGO_CRATE_NAME"), log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };

    // Override config with CLI args if provided
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(cookie) = args.cookie {
        config.session_cookie = Some(cookie);
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    let timeout = config.timeout();
    let client = TranslationClient::new(config)?;

    // Execute command
    match args.command {
        Commands::Translate {
            text,
            format,
            vocabulary,
            download,
        } => {
            commands::handle_translate(&client, text, format, vocabulary, download, timeout)
                .await?;
        }
        Commands::Download {
            file_url,
            output_dir,
        } => {
            let output_dir =
                output_dir.unwrap_or_else(|| client.config().download_dir.clone());
            commands::handle_download(
                &client,
                ArtifactReference::new(file_url),
                output_dir,
                timeout,
            )
            .await?;
        }
    }

    Ok(())
}
