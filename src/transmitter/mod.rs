//! Payload transmitters for the GELF wire protocol.
//!
//! A [`Transmitter`] delivers one encoded payload per call over its
//! transport. Two concrete transports are provided, [`TcpTransmitter`] and
//! [`UdpTransmitter`], plus [`CircuitBreakerTransmitter`], a decorator that
//! wraps any transmitter to stop issuing calls to a consistently failing
//! peer. All operations on one instance are serialised through a single
//! lock, so concurrent callers never interleave partial frames or race on
//! channel state.

use std::io;

use thiserror::Error;

use crate::payload::Payload;

mod breaker;
mod tcp;
mod udp;


pub use breaker::CircuitBreakerTransmitter;
pub use tcp::TcpTransmitter;
pub use udp::{MAX_UDP_DATAGRAM_SIZE, UdpTransmitter};

/// Errors surfaced by a transmitter.
///
/// Only [`TransmitError::Io`] is connection-class; the circuit breaker
/// counts nothing else towards tripping.
#[derive(Debug, Error)]
pub enum TransmitError {
    /// Socket, timeout, resolution or other I/O failure during open or
    /// write. The transport discards its cached channel so the next call
    /// re-establishes it.
    #[error("i/o failure during transmission: {0}")]
    Io(#[from] io::Error),
    /// The payload could not be encoded as GELF JSON.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    /// The payload could not be compressed.
    #[error("payload compression failed: {0}")]
    Compress(#[source] io::Error),
    /// The circuit breaker is open and refused to attempt transmission.
    #[error("circuit is open and the message cannot be processed")]
    CircuitOpen,
}

impl TransmitError {
    /// True for failures that indicate a broken or unreachable peer.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, TransmitError::Io(_))
    }
}

/// Synchronous, one-message-per-call payload transmitter.
///
/// `transmit` blocks the calling thread for the duration of the network
/// write; there are no background threads or queues. Implementations use
/// interior mutability so a shared reference is enough to drive them, which
/// also lets the breaker hold any transport behind `Box<dyn Transmitter>`.
pub trait Transmitter: Send {
    /// Establish the underlying channel. `transmit` opens lazily, so
    /// calling this up front is optional.
    fn open(&self) -> Result<(), TransmitError>;

    /// Encode and deliver one payload.
    fn transmit(&self, payload: &Payload) -> Result<(), TransmitError>;

    /// Close the underlying channel if present. Idempotent.
    fn close(&self) -> Result<(), TransmitError>;
}

#[cfg(unix)]
fn set_send_buffer_size<S: std::os::fd::AsFd>(socket: &S, size: usize) -> io::Result<()> {
    use nix::sys::socket::{setsockopt, sockopt::SndBuf};
    setsockopt(socket, SndBuf, &size).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn set_send_buffer_size<S>(_socket: &S, _size: usize) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "send buffer sizing is not supported on this platform",
    ))
}
