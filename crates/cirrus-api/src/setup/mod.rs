//! Application setup: state construction, routes, server startup.

pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;

use cirrus_core::Config;
use cirrus_provider::CloudinaryClient;

use crate::state::AppState;
use crate::telemetry;

/// Build the application state and router from configuration.
pub fn initialize_app(config: Config) -> Result<(AppState, Router), anyhow::Error> {
    telemetry::init_telemetry();

    let provider = CloudinaryClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create provider client: {}", e))?;
    let state = AppState::new(config.clone(), Arc::new(provider));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
