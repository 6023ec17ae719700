// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests.

use parlor::config::Config;
use parlor::server::{connection_loop, initialization};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// How long any single receive may take before the test is declared hung.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Spawns a chat server on an ephemeral loopback port and returns the
/// address it is listening on.
pub async fn start_server() -> SocketAddr {
    let config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        ..Config::default()
    };
    let ctx = initialization::setup(config)
        .await
        .expect("server setup failed");
    let addr = ctx.local_addr().expect("listener has no local addr");
    tokio::spawn(connection_loop::run(ctx));
    addr
}

/// One test client: a raw TCP connection with line-oriented reading of the
/// server's enveloped messages.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Sends one chat line; the trailing newline is appended here.
    pub async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write failed");
    }

    /// Reads the next enveloped message, skipping the blank lines produced
    /// by the `\r\n...\r\n` wrapping.
    pub async fn recv(&mut self) -> String {
        timeout(RECV_TIMEOUT, async {
            loop {
                let mut line = String::new();
                let n = self.reader.read_line(&mut line).await.expect("read failed");
                assert!(n > 0, "server closed the connection unexpectedly");
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        })
        .await
        .expect("timed out waiting for a message")
    }

    /// Asserts that the server closes this connection without delivering any
    /// further messages.
    pub async fn expect_eof(&mut self) {
        timeout(RECV_TIMEOUT, async {
            loop {
                let mut line = String::new();
                let n = self.reader.read_line(&mut line).await.expect("read failed");
                if n == 0 {
                    return;
                }
                assert!(
                    line.trim().is_empty(),
                    "unexpected message before EOF: {line:?}"
                );
            }
        })
        .await
        .expect("timed out waiting for EOF")
    }
}

/// Connects a client and completes the join handshake: the welcome is read
/// and a nickname is negotiated. Receiving the rename confirmation proves
/// the server has fully registered the session, so later joins observe this
/// one in their welcome count.
pub async fn join(addr: SocketAddr, nick: &str) -> (TestClient, String) {
    let mut client = TestClient::connect(addr).await;
    let welcome = client.recv().await;
    client.send_line(&format!("/nick {nick}")).await;
    let confirmation = client.recv().await;
    assert_eq!(
        confirmation,
        format!("Your nickname has been changed to {nick}")
    );
    (client, welcome)
}
