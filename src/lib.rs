//! GELF payload transmission over TCP and UDP.
//!
//! This crate implements the client side of the Graylog Extended Log
//! Format wire protocol: a reusable [`Payload`] record, a validator for the
//! protocol's mandatory fields, a JSON encoder with GELF's conditional
//! field emission rules, and synchronous [`Transmitter`] implementations
//! for TCP (NUL-byte framing) and UDP (optional ZLIB compression and
//! chunked-GELF fragmentation). [`CircuitBreakerTransmitter`] wraps either
//! transport to stop issuing calls to a consistently failing collector.
//!
//! Mapping log-framework events into payloads, plugin lifecycles and
//! configuration loading are the host integration layer's concern; this
//! crate consumes a populated payload and puts bytes on the wire.
//!
//! ```no_run
//! use gelf_transmitter::{
//!     Payload, TransmitterConfig, UdpConfig, check_valid, config::DEFAULT_VERSION,
//! };
//!
//! # fn main() -> Result<(), gelf_transmitter::TransmitError> {
//! let transmitter = TransmitterConfig::udp(UdpConfig::new("graylog.example.org")).build();
//! let mut payload = Payload::new();
//! payload.set_version(DEFAULT_VERSION);
//! payload.set_host("app-host");
//! payload.set_short_message("service started");
//! if check_valid(&payload) {
//!     transmitter.transmit(&payload)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoder;
pub mod payload;
pub mod transmitter;
pub mod validate;

pub use config::{
    BreakerConfig, CompressionConfig, TcpConfig, TransmitterConfig, TransportConfig, UdpConfig,
};
pub use encoder::encode;
pub use payload::Payload;
pub use transmitter::{
    CircuitBreakerTransmitter, TcpTransmitter, TransmitError, Transmitter, UdpTransmitter,
};
pub use validate::check_valid;
