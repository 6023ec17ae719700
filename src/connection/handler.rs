// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a
//! client connection.

use super::session::Session;
use crate::core::{ChatError, ChatRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The next step for the connection's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages the full lifecycle of a client connection: joins the registry,
/// dispatches inbound messages, and deregisters on exit.
pub struct ConnectionHandler {
    session: Arc<Session>,
    registry: Arc<ChatRegistry>,
    addr: SocketAddr,
}

impl ConnectionHandler {
    /// Creates a new `ConnectionHandler`.
    pub fn new(session: Arc<Session>, registry: Arc<ChatRegistry>, addr: SocketAddr) -> Self {
        Self {
            session,
            registry,
            addr,
        }
    }

    /// The main event loop for the connection.
    ///
    /// Joining: register with the registry; a failed welcome discards the
    /// connection. Active: read one message at a time, trim it, and dispatch.
    /// Leaving: deregister and close, reached either through `exit` or
    /// through any read error.
    pub async fn run(self) -> Result<(), ChatError> {
        if let Err(e) = self.registry.add(self.session.clone()).await {
            warn!(
                "Failed to register session {} from {}: {}",
                self.session.id, self.addr, e
            );
            return Err(e);
        }
        info!("Session {} joined from {}", self.session.id, self.addr);

        loop {
            let raw = match self.session.read_message().await {
                Ok(raw) => raw,
                Err(e) => {
                    self.registry.remove(&self.session).await;
                    if is_normal_disconnect(&e) {
                        debug!("Session {} disconnected", self.session.id);
                    } else {
                        warn!("Read error on session {}: {}", self.session.id, e);
                    }
                    return Ok(());
                }
            };

            let message = raw.trim();
            if message.is_empty() {
                continue;
            }

            match self.process_message(message).await {
                NextAction::Continue => {}
                NextAction::ExitLoop => return Ok(()),
            }
        }
    }

    /// Dispatches one trimmed, non-empty inbound message.
    async fn process_message(&self, message: &str) -> NextAction {
        if message == "exit" {
            let nickname = self.session.nickname();
            self.registry.remove(&self.session).await;
            self.registry
                .broadcast(&format!("User {nickname} has left the chat room"))
                .await;
            info!("Session {} left the chat room", self.session.id);
            return NextAction::ExitLoop;
        }

        if message.starts_with('/') {
            self.process_command(message).await;
            return NextAction::Continue;
        }

        let text = format!("{}: {}", self.session.nickname(), message);
        self.registry.broadcast(&text).await;
        NextAction::Continue
    }

    /// Handles a `/`-prefixed command.
    ///
    /// Only `/nick <name>` is recognized, splitting on the first space; the
    /// confirmation goes to the sender alone. Anything else is dropped
    /// without a reply or a broadcast.
    async fn process_command(&self, command: &str) {
        let mut parts = command.splitn(2, ' ');
        let name = parts.next().unwrap_or_default();
        let new_nickname = parts.next().unwrap_or_default();

        if name == "/nick" && !new_nickname.is_empty() {
            self.session.set_nickname(new_nickname);
            if let Err(e) = self
                .session
                .send_message(&format!(
                    "Your nickname has been changed to {new_nickname}"
                ))
                .await
            {
                debug!(
                    "Failed to confirm rename to session {}: {}",
                    self.session.id, e
                );
            }
        }
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &ChatError) -> bool {
    match e {
        ChatError::ConnectionClosed => true,
        ChatError::Io(arc_err) => matches!(
            arc_err.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionAborted
        ),
    }
}
