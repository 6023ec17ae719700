// src/connection/mod.rs

//! Manages the lifecycle of a single client connection: session identity,
//! message dispatch, and deregistration on exit.

// Declare the private sub-modules of the `connection` module.
mod handler;
mod session;

// Publicly re-export the primary types from the sub-modules.
pub use handler::ConnectionHandler;
pub use session::Session;
