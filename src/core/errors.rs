// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From`
/// trait implementations.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// The peer closed its end of the stream before any part of a message
    /// arrived.
    #[error("Connection closed by peer")]
    ConnectionClosed,
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for ChatError {
    fn clone(&self) -> Self {
        match self {
            ChatError::Io(e) => ChatError::Io(Arc::clone(e)),
            ChatError::ConnectionClosed => ChatError::ConnectionClosed,
        }
    }
}

impl From<std::io::Error> for ChatError {
    fn from(e: std::io::Error) -> Self {
        ChatError::Io(Arc::new(e))
    }
}
