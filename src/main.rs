//! Support Chat Moderator — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the session registry, external-service
//! clients, and the contact-request log.

mod api;
mod config;
mod contact_log;
mod error;
mod lockmenu;
mod moderation;
mod router;
mod services;
mod session;

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{ServicesConfig, DEFAULT_CONFIG_PATH};
use crate::contact_log::FileContactSink;
use crate::services::Services;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_CONTACT_LOG_PATH: &str = "contact_logs.txt";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("support_chat_moderator=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Config file is optional; defaults + env keys cover the common case.
    let config_path =
        std::env::var("SERVICES_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = match ServicesConfig::load_from_file(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %config_path, error = %e, "config not loaded, using defaults");
            ServicesConfig::from_env()
        }
    };

    let services = Services::from_config(&cfg);
    let contact_path =
        std::env::var("CONTACT_LOG_PATH").unwrap_or_else(|_| DEFAULT_CONTACT_LOG_PATH.to_string());
    let state = api::AppState::new(services, Arc::new(FileContactSink::new(contact_path)));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "support chat moderator listening");
    axum::serve(listener, api::router(state)).await?;
    Ok(())
}
