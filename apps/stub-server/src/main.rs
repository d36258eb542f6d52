//! # Stub Server
//!
//! The main entry point for the Actix-web development backend.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

use stub_server::config::AppConfig;
use stub_server::state::AppState;
use stub_server::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting stub backend on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new();

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(TracingLogger::default())
            .configure(move |cfg| stub_server::configure(&state, cfg))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
