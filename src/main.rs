mod context;
mod crypto;
mod passkey;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use context::AppContext;
use crypto::challenge::{challenge_from_payload, random_challenge};
use settings::Settings;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about = "Create and use a passkey through the platform authenticator")]
struct Cli {
    /// Settings file to load instead of ./settings.toml
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a passkey
    Create,
    /// Sign with a passkey
    Sign,
    /// Print the challenge derived from a payload
    Challenge { payload: String },
    /// Print a random hex challenge
    RandomChallenge,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Create => {
            let context = load_context(cli.config.as_deref())?;
            context.passkey_service.create_passkey().await;
        }
        Command::Sign => {
            let context = load_context(cli.config.as_deref())?;
            context.passkey_service.sign_with_passkey().await;
        }
        Command::Challenge { payload } => println!("{}", challenge_from_payload(&payload)),
        Command::RandomChallenge => println!("{}", random_challenge()),
    }

    Ok(())
}

fn load_context(config: Option<&Path>) -> Result<AppContext> {
    let settings = match config {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };
    debug!(?settings, "loaded settings");

    Ok(AppContext::from_settings(&settings))
}
