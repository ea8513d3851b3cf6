use std::sync::Arc;

use anyhow::{Context, Result};
use mflix_server::{
    AppState,
    config::Settings,
    connection::ConnectionManager,
    startup::{run, shutdown_signal},
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Before tracing, so RUST_LOG may come from .env.
    dotenvy::dotenv().ok();
    init_tracing("info");

    let settings = Settings::from_env().context("Failed to load configuration")?;

    let connections = Arc::new(ConnectionManager::mongo());
    connections.connect(&settings.connection).await;

    let state = AppState {
        connections,
        comments: settings.comments.clone(),
    };

    run(settings.bind_addr(), state, shutdown_signal()).await
}
