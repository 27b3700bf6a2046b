//! Tandberg Pantry CLI - Reset the local Firestore emulator.
//!
//! # Usage
//!
//! ```bash
//! # Clear the seeded collections and write the sample data
//! pantry-seed
//!
//! # Same, explicitly
//! pantry-seed reset
//!
//! # Only clear, or only populate
//! pantry-seed clear
//! pantry-seed populate
//! ```
//!
//! # Exit Status
//!
//! `clear` and `populate` exit with status 1 on failure. `reset` logs any
//! workflow failure and exits 0.
//!
//! # Logging
//!
//! `RUST_LOG` overrides the default filter. Set `LOG_FORMAT=json` for JSON
//! log lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tandberg_pantry_seeder::{EmulatorConfig, FirestoreEmulator};

mod commands;

#[derive(Parser)]
#[command(name = "pantry-seed")]
#[command(author, version, about = "Reset the Tandberg Pantry Firestore emulator")]
struct Cli {
    /// What to do with the emulator data
    #[arg(value_enum, default_value_t = Command::Reset)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Delete all documents in the seeded collections
    Clear,
    /// Write the sample data
    Populate,
    /// Clear, then populate
    Reset,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tandberg_pantry_seeder=info,tandberg_pantry_cli=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = EmulatorConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    let emulator = FirestoreEmulator::new(&config)?;
    tracing::info!(url = %emulator.documents_url(), "Using Firestore emulator");

    match cli.command {
        Command::Clear => commands::emulator::clear(&emulator).await?,
        Command::Populate => commands::emulator::populate(&emulator).await?,
        Command::Reset => commands::emulator::reset(&emulator).await?,
    }
    Ok(())
}
