// src/core/protocol/mod.rs

//! The wire protocol: delimiter-framed inbound messages and CRLF-enveloped
//! outbound messages.

mod framed;

pub use framed::{FramedConnection, MESSAGE_DELIMITER};
