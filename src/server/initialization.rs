// src/server/initialization.rs

//! Handles server initialization: listener binding and shared state
//! construction.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::ChatRegistry;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::info;

/// Initializes all server components before starting the main loop.
///
/// A bind failure is fatal and reported to the caller, unlike accept errors
/// which the connection loop tolerates.
pub async fn setup(config: Config) -> Result<ServerContext> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    info!("Chat server listening on {}:{}", config.host, config.port);

    let connection_permits = Arc::new(Semaphore::new(config.max_clients));
    let registry = Arc::new(ChatRegistry::new());
    info!(
        "Registry initialized; accepting up to {} clients",
        config.max_clients
    );

    Ok(ServerContext {
        registry,
        listener,
        connection_permits,
    })
}
