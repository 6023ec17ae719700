// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling
//! graceful shutdown.

use super::context::ServerContext;
use crate::connection::{ConnectionHandler, Session};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// The main server loop that accepts connections and handles graceful
/// shutdown.
///
/// Accept errors are logged and never fatal; every accepted connection gets
/// its own session id, session, and handler task. The loop itself only ends
/// on SIGINT or SIGTERM.
pub async fn run(ctx: ServerContext) {
    let mut session_id_counter: u64 = 0;
    let mut client_tasks: JoinSet<()> = JoinSet::new();

    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");

    loop {
        tokio::select! {
            biased;

            _ = sigint.recv() => {
                info!("SIGINT received, initiating graceful shutdown.");
                break;
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, initiating graceful shutdown.");
                break;
            }

            res = ctx.listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        info!("Accepted new connection from: {}", addr);

                        session_id_counter = session_id_counter.wrapping_add(1);
                        let session = Arc::new(Session::new(session_id_counter, socket, addr));
                        let handler = ConnectionHandler::new(session, ctx.registry.clone(), addr);

                        // At capacity, accepting pauses until a client leaves;
                        // the permit travels with the handler task.
                        let permit = ctx
                            .connection_permits
                            .clone()
                            .acquire_owned()
                            .await
                            .expect("connection semaphore closed");
                        client_tasks.spawn(async move {
                            let _permit = permit;
                            if let Err(e) = handler.run().await {
                                warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => error!("Failed to accept connection: {}", e),
                }
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        error!("A client handler panicked: {e:?}");
                    }
                }
            },
        }
    }

    info!("Shutting down. Notifying connected sessions.");
    ctx.registry.broadcast("Server is shutting down").await;

    client_tasks.shutdown().await;
    info!("All client connections closed. Server shutdown complete.");
}
