//! # Blog Console
//!
//! Command-line front-end: lists, searches, shows, saves and deletes posts
//! and comments through the entity stores.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod state;
mod telemetry;

use cli::Cli;
use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::new(cli.backend);
    let state = AppState::new(&config)?;

    commands::run(&state, cli.resource).await
}
