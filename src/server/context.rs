// src/server/context.rs

use crate::core::ChatRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

/// Holds all the initialized state required to run the server's main loop.
pub struct ServerContext {
    pub registry: Arc<ChatRegistry>,
    pub listener: TcpListener,
    pub connection_permits: Arc<Semaphore>,
}

impl ServerContext {
    /// The address the listener is actually bound to. Useful when the
    /// configured port was 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
