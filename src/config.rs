//! Configuration surface consumed by the transmitters.
//!
//! The host integration layer (an appender, a service wrapper) owns where
//! these values come from; this module defines the exact knobs the
//! transmission core honours, with defaults matching the reference GELF
//! client, and a small factory for assembling a ready transmitter stack.

use std::time::Duration;

use crate::transmitter::{
    CircuitBreakerTransmitter, TcpTransmitter, Transmitter, UdpTransmitter,
};

/// Default GELF server port.
pub const DEFAULT_PORT: u16 = 12201;
/// Default socket timeout applied to TCP connect and blocking writes.
pub const DEFAULT_SO_TIMEOUT: Duration = Duration::from_millis(2000);
/// Default ZLIB compression level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 5;
/// Default encoded size in bytes above which UDP payloads are compressed.
pub const DEFAULT_COMPRESSION_LIMIT: usize = 4096;
/// Default number of connection failures that trips the circuit breaker.
pub const DEFAULT_MAX_FAILURES: u32 = 10;
/// Default cooldown before the breaker permits a trial call.
pub const DEFAULT_RECOVERY_PERIOD: Duration = Duration::from_secs(20);
/// Default GELF protocol version string.
pub const DEFAULT_VERSION: &str = "1.1";

/// TCP transport configuration.
#[derive(Clone, Debug)]
pub struct TcpConfig {
    /// Hostname or IP address of the GELF server.
    pub host: String,
    /// TCP port number.
    pub port: u16,
    /// Socket timeout for connect, and for writes in blocking mode.
    pub so_timeout: Duration,
    /// Use blocking I/O when true, non-blocking otherwise.
    pub blocking: bool,
    /// Explicit send buffer size in bytes; `None` keeps the OS default.
    /// Only applied in non-blocking mode.
    pub send_buffer_size: Option<usize>,
}

impl TcpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            so_timeout: DEFAULT_SO_TIMEOUT,
            blocking: true,
            send_buffer_size: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_so_timeout(mut self, so_timeout: Duration) -> Self {
        self.so_timeout = so_timeout;
        self
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_send_buffer_size(mut self, size: Option<usize>) -> Self {
        self.send_buffer_size = size;
        self
    }
}

/// UDP transport configuration.
#[derive(Clone, Debug)]
pub struct UdpConfig {
    /// Hostname or IP address of the GELF server.
    pub host: String,
    /// UDP port number.
    pub port: u16,
    /// Explicit send buffer size in bytes; `None` keeps the OS default.
    pub send_buffer_size: Option<usize>,
    /// Compression settings; `None` disables compression.
    pub compression: Option<CompressionConfig>,
}

impl UdpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            send_buffer_size: None,
            compression: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_send_buffer_size(mut self, size: Option<usize>) -> Self {
        self.send_buffer_size = size;
        self
    }

    pub fn with_compression(mut self, compression: Option<CompressionConfig>) -> Self {
        self.compression = compression;
        self
    }
}

/// ZLIB compression settings for the UDP transport.
#[derive(Clone, Copy, Debug)]
pub struct CompressionConfig {
    level: u32,
    limit: usize,
}

impl CompressionConfig {
    /// Create settings with the given level (clamped to 1-9) and size
    /// threshold in bytes.
    pub fn new(level: u32, limit: usize) -> Self {
        Self {
            level: level.clamp(1, 9),
            limit,
        }
    }

    /// ZLIB compression level, 1-9.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Encoded size above which compression is applied.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_COMPRESSION_LEVEL,
            limit: DEFAULT_COMPRESSION_LIMIT,
        }
    }
}

/// Circuit breaker settings.
#[derive(Clone, Copy, Debug)]
pub struct BreakerConfig {
    /// Consecutive connection failures before the breaker opens.
    pub max_failures: u32,
    /// Cooldown before one trial call is permitted.
    pub recovery_period: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: DEFAULT_MAX_FAILURES,
            recovery_period: DEFAULT_RECOVERY_PERIOD,
        }
    }
}

/// Transport selection for a transmitter stack.
#[derive(Clone, Debug)]
pub enum TransportConfig {
    Tcp(TcpConfig),
    Udp(UdpConfig),
}

/// Complete description of a transmitter stack: one transport, optionally
/// wrapped by a circuit breaker.
#[derive(Clone, Debug)]
pub struct TransmitterConfig {
    pub transport: TransportConfig,
    pub breaker: Option<BreakerConfig>,
}

impl TransmitterConfig {
    pub fn tcp(config: TcpConfig) -> Self {
        Self {
            transport: TransportConfig::Tcp(config),
            breaker: None,
        }
    }

    pub fn udp(config: UdpConfig) -> Self {
        Self {
            transport: TransportConfig::Udp(config),
            breaker: None,
        }
    }

    pub fn with_breaker(mut self, breaker: Option<BreakerConfig>) -> Self {
        self.breaker = breaker;
        self
    }

    /// Assemble the configured transmitter, boxed so callers can hold any
    /// stack behind the same trait object.
    pub fn build(self) -> Box<dyn Transmitter> {
        let delegate: Box<dyn Transmitter> = match self.transport {
            TransportConfig::Tcp(config) => Box::new(TcpTransmitter::new(config)),
            TransportConfig::Udp(config) => Box::new(UdpTransmitter::new(config)),
        };
        match self.breaker {
            Some(breaker) => Box::new(CircuitBreakerTransmitter::new(breaker, delegate)),
            None => delegate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_level_is_clamped() {
        assert_eq!(CompressionConfig::new(0, 1024).level(), 1);
        assert_eq!(CompressionConfig::new(12, 1024).level(), 9);
        assert_eq!(CompressionConfig::new(7, 1024).level(), 7);
    }

    #[test]
    fn tcp_config_defaults() {
        let config = TcpConfig::new("graylog.example.org");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.so_timeout, DEFAULT_SO_TIMEOUT);
        assert!(config.blocking);
        assert!(config.send_buffer_size.is_none());
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = UdpConfig::new("graylog.example.org")
            .with_port(2201)
            .with_compression(Some(CompressionConfig::default()));
        assert_eq!(config.port, 2201);
        assert!(config.compression.is_some());
    }
}
