// src/core/protocol/framed.rs

//! Implements `FramedConnection`, the message framing layer over a raw TCP
//! stream.

use crate::core::ChatError;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

/// The byte that terminates an inbound message.
pub const MESSAGE_DELIMITER: u8 = b'\n';

/// The CRLF (Carriage Return, Line Feed) sequence wrapped around every
/// outbound message.
const CRLF: &[u8] = b"\r\n";

/// Size of the read scratch buffer. Independent of message size: longer
/// messages span multiple reads.
const READ_CHUNK_SIZE: usize = 1024;

/// A TCP stream with message framing on top.
///
/// Inbound messages accumulate across reads until a chunk ends with the
/// delimiter; outbound messages are wrapped in a `\r\n...\r\n` envelope and
/// written as one buffer. The two halves are locked individually so that
/// broadcasts from other tasks can write while the owning handler is blocked
/// in a read.
#[derive(Debug)]
pub struct FramedConnection {
    reader: Mutex<MessageReader>,
    writer: Mutex<OwnedWriteHalf>,
}

/// The read half together with its scratch buffer. Only the handler that
/// owns the connection ever locks this.
#[derive(Debug)]
struct MessageReader {
    half: OwnedReadHalf,
    scratch: [u8; READ_CHUNK_SIZE],
}

impl FramedConnection {
    /// Takes ownership of an accepted stream and splits it for concurrent
    /// read and write access.
    pub fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: Mutex::new(MessageReader {
                half: read_half,
                scratch: [0u8; READ_CHUNK_SIZE],
            }),
            writer: Mutex::new(write_half),
        }
    }

    /// Reads one message, delimiter included.
    ///
    /// Chunks are appended to an accumulator until the last byte of the
    /// current chunk equals `delim`. The check inspects only the current
    /// chunk's final byte, so a delimiter is recognized where the sender's
    /// write ends rather than at an arbitrary position in the accumulated
    /// text.
    ///
    /// End-of-stream with an empty accumulator is reported as
    /// [`ChatError::ConnectionClosed`]; end-of-stream mid-message returns the
    /// partial text without its delimiter.
    pub async fn read_message(&self, delim: u8) -> Result<String, ChatError> {
        let mut guard = self.reader.lock().await;
        let MessageReader { half, scratch } = &mut *guard;

        let mut message = BytesMut::new();
        loop {
            let n = half.read(scratch).await?;
            if n == 0 {
                if message.is_empty() {
                    return Err(ChatError::ConnectionClosed);
                }
                break;
            }
            message.extend_from_slice(&scratch[..n]);
            if scratch[n - 1] == delim {
                break;
            }
        }
        Ok(String::from_utf8_lossy(&message).into_owned())
    }

    /// Writes `text` wrapped in the CRLF envelope as a single buffer.
    pub async fn send_message(&self, text: &str) -> Result<(), ChatError> {
        let mut envelope = BytesMut::with_capacity(text.len() + 2 * CRLF.len());
        envelope.extend_from_slice(CRLF);
        envelope.extend_from_slice(text.as_bytes());
        envelope.extend_from_slice(CRLF);

        let mut writer = self.writer.lock().await;
        writer.write_all(&envelope).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Shuts down the write half of the stream, signalling EOF to the peer.
    /// A second close reports whatever the transport returns; callers treat
    /// that as a log-only event.
    pub async fn close(&self) -> Result<(), ChatError> {
        let mut writer = self.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }
}
