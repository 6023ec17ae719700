// src/core/registry.rs

//! The shared registry of connected sessions and its broadcast fan-out.

use crate::connection::Session;
use crate::core::ChatError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// The session map and its count, guarded as one unit so no reader can ever
/// observe a state where the two disagree.
#[derive(Debug, Default)]
struct RegistryInner {
    sessions: HashMap<u64, Arc<Session>>,
    count: usize,
}

/// The shared set of connected sessions.
///
/// Constructed once per server instance and handed by `Arc` to every
/// connection handler. Broadcast iterates under the read lock; add and remove
/// take the write lock. The registry never closes a connection on its own
/// initiative: the handler that registered a session drives its removal.
#[derive(Debug, Default)]
pub struct ChatRegistry {
    inner: RwLock<RegistryInner>,
}

impl ChatRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a session: welcomes it first, then inserts it.
    ///
    /// The welcome reports the number of users online *before* the insertion,
    /// and a session is never inserted when its welcome cannot be delivered.
    /// A joining client therefore neither counts itself nor receives
    /// broadcasts issued while it was still joining.
    pub async fn add(&self, session: Arc<Session>) -> Result<(), ChatError> {
        let online = self.inner.read().await.count;
        session
            .send_message(&format!(
                "Welcome to chat room!, there are {online} users online"
            ))
            .await?;

        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id, session);
        inner.count += 1;
        Ok(())
    }

    /// Deregisters a session: farewell, delete, close.
    ///
    /// Every failure here is log-only. The count is decremented only when an
    /// entry was actually removed, so removing the same session twice cannot
    /// desynchronize it from the map.
    pub async fn remove(&self, session: &Session) {
        if let Err(e) = session.send_message("Bye").await {
            warn!("Failed to send farewell to session {}: {}", session.id, e);
        }

        {
            let mut inner = self.inner.write().await;
            if inner.sessions.remove(&session.id).is_some() {
                inner.count -= 1;
            }
        }

        if let Err(e) = session.close().await {
            warn!(
                "Failed to close connection of session {}: {}",
                session.id, e
            );
        }
    }

    /// Sends `text` to every registered session.
    ///
    /// The session set is iterated under the read lock, so the recipients are
    /// a point-in-time snapshot. A failed delivery is logged and skipped; the
    /// remaining recipients still receive the message.
    pub async fn broadcast(&self, text: &str) {
        let inner = self.inner.read().await;
        for session in inner.sessions.values() {
            if let Err(e) = session.send_message(text).await {
                warn!("Broadcast to session {} failed: {}", session.id, e);
            }
        }
    }

    /// The number of registered sessions.
    pub async fn online_count(&self) -> usize {
        self.inner.read().await.count
    }

    /// Whether a session id is currently registered.
    pub async fn contains(&self, session_id: u64) -> bool {
        self.inner.read().await.sessions.contains_key(&session_id)
    }
}
