//! TCP transport with NUL-byte framing.
//!
//! GELF over TCP carries no compression and no chunking: messages on one
//! connection are delimited solely by a `\0` byte, which would collide with
//! compressed binary content.

use std::{
    io::{self, Write},
    net::{TcpStream, ToSocketAddrs},
};

use log::debug;
use parking_lot::Mutex;

use crate::{config::TcpConfig, encoder::encode, payload::Payload};

use super::{TransmitError, Transmitter, set_send_buffer_size};

const FRAME_DELIMITER: u8 = 0;

/// Transmitter delivering one NUL-terminated JSON frame per call over a
/// persistent stream connection.
///
/// Peers may reset a connection without a clean close (a firewall rule
/// renewal, for instance). Rather than running a background health check,
/// any write failure discards the cached stream and the next `transmit`
/// call reconnects.
pub struct TcpTransmitter {
    config: TcpConfig,
    channel: Mutex<Option<TcpStream>>,
}

impl TcpTransmitter {
    pub fn new(config: TcpConfig) -> Self {
        Self {
            config,
            channel: Mutex::new(None),
        }
    }

    fn connect(&self) -> io::Result<TcpStream> {
        let addrs = (self.config.host.as_str(), self.config.port).to_socket_addrs()?;
        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.config.so_timeout) {
                Ok(stream) => {
                    self.configure(&stream)?;
                    debug!(
                        "connected to {}:{} over tcp",
                        self.config.host, self.config.port
                    );
                    return Ok(stream);
                }
                Err(err) => last_error = Some(err),
            }
        }
        Err(last_error.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!(
                    "no addresses resolved for {}:{}",
                    self.config.host, self.config.port
                ),
            )
        }))
    }

    fn configure(&self, stream: &TcpStream) -> io::Result<()> {
        if self.config.blocking {
            stream.set_nonblocking(false)?;
            stream.set_write_timeout(Some(self.config.so_timeout))?;
        } else {
            stream.set_nonblocking(true)?;
            if let Some(size) = self.config.send_buffer_size {
                set_send_buffer_size(stream, size)?;
            }
        }
        Ok(())
    }
}

impl Transmitter for TcpTransmitter {
    fn open(&self) -> Result<(), TransmitError> {
        let mut channel = self.channel.lock();
        *channel = Some(self.connect()?);
        Ok(())
    }

    fn transmit(&self, payload: &Payload) -> Result<(), TransmitError> {
        let mut frame = encode(payload)?;
        frame.push(FRAME_DELIMITER);

        let mut channel = self.channel.lock();
        let mut stream = match channel.take() {
            Some(stream) => stream,
            None => self.connect()?,
        };
        // On failure the stream is dropped so the next call reconnects.
        stream.write_all(&frame)?;
        *channel = Some(stream);
        Ok(())
    }

    fn close(&self) -> Result<(), TransmitError> {
        // Dropping the stream closes the socket.
        self.channel.lock().take();
        Ok(())
    }
}
