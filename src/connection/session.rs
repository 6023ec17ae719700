// src/connection/session.rs

//! Defines `Session`, one connected client's identity and transport.

use crate::core::ChatError;
use crate::core::protocol::{FramedConnection, MESSAGE_DELIMITER};
use parking_lot::RwLock;
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// One connected client: a unique numeric id, a mutable nickname, and the
/// framed connection it exclusively owns.
#[derive(Debug)]
pub struct Session {
    /// Unique id, assigned from a monotonic counter at accept time.
    pub id: u64,
    nickname: RwLock<String>,
    connection: FramedConnection,
}

impl Session {
    /// Wraps an accepted stream. The initial nickname is derived from the
    /// peer's port.
    pub fn new(id: u64, stream: TcpStream, addr: SocketAddr) -> Self {
        Self {
            id,
            nickname: RwLock::new(format!("User{}", addr.port())),
            connection: FramedConnection::new(stream),
        }
    }

    pub fn nickname(&self) -> String {
        self.nickname.read().clone()
    }

    /// Renames the session. A broadcast racing with the rename may observe
    /// either name.
    pub fn set_nickname(&self, name: impl Into<String>) {
        *self.nickname.write() = name.into();
    }

    pub async fn read_message(&self) -> Result<String, ChatError> {
        self.connection.read_message(MESSAGE_DELIMITER).await
    }

    pub async fn send_message(&self, text: &str) -> Result<(), ChatError> {
        self.connection.send_message(text).await
    }

    pub async fn close(&self) -> Result<(), ChatError> {
        self.connection.close().await
    }
}
