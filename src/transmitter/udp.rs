//! UDP transport with optional compression and chunked-GELF framing.
//!
//! A single datagram carries at most [`MAX_UDP_DATAGRAM_SIZE`] bytes.
//! Payloads above the compression threshold are ZLIB-deflated first; if the
//! result still does not fit, it is fragmented into chunked-GELF datagrams:
//! two magic bytes, an eight-byte random message id shared by every chunk,
//! a sequence index, a sequence count, then the payload slice. Delivery is
//! fire and forget; no acknowledgement exists and none is awaited.

use std::{
    io::{self, Write},
    net::UdpSocket,
};

use flate2::{Compression, write::ZlibEncoder};
use log::{debug, warn};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{config::UdpConfig, encoder::encode, payload::Payload};

use super::{TransmitError, Transmitter, set_send_buffer_size};

/// Largest datagram the GELF UDP transport will emit.
pub const MAX_UDP_DATAGRAM_SIZE: usize = 8192;

const CHUNKED_MAGIC: [u8; 2] = [0x1e, 0x0f];
const MESSAGE_ID_SIZE: usize = 8;
const CHUNK_HEADER_SIZE: usize = CHUNKED_MAGIC.len() + MESSAGE_ID_SIZE + 2;
const CHUNK_DATA_SIZE: usize = MAX_UDP_DATAGRAM_SIZE - CHUNK_HEADER_SIZE;
// Receivers read the sequence count as a signed byte, so 127 is the most
// chunks one message may carry.
const MAX_CHUNK_COUNT: usize = 127;

struct UdpChannel {
    socket: Option<UdpSocket>,
    rng: StdRng,
}

/// Transmitter delivering one message as one or more datagrams.
pub struct UdpTransmitter {
    config: UdpConfig,
    channel: Mutex<UdpChannel>,
}

impl UdpTransmitter {
    pub fn new(config: UdpConfig) -> Self {
        Self {
            config,
            channel: Mutex::new(UdpChannel {
                socket: None,
                rng: StdRng::from_entropy(),
            }),
        }
    }

    fn connect(&self) -> io::Result<UdpSocket> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect((self.config.host.as_str(), self.config.port))?;
        // Blocking datagram writes make no sense.
        socket.set_nonblocking(true)?;
        if let Some(size) = self.config.send_buffer_size {
            set_send_buffer_size(&socket, size)?;
        }
        debug!(
            "connected to {}:{} over udp",
            self.config.host, self.config.port
        );
        Ok(socket)
    }
}

impl Transmitter for UdpTransmitter {
    fn open(&self) -> Result<(), TransmitError> {
        let mut channel = self.channel.lock();
        channel.socket = Some(self.connect()?);
        Ok(())
    }

    fn transmit(&self, payload: &Payload) -> Result<(), TransmitError> {
        let mut bytes = encode(payload)?;
        if let Some(compression) = self.config.compression {
            if bytes.len() > compression.limit() {
                bytes = compress(&bytes, compression.level())?;
            }
        }

        let mut channel = self.channel.lock();

        if bytes.len() <= MAX_UDP_DATAGRAM_SIZE {
            let socket = match channel.socket.take() {
                Some(socket) => socket,
                None => self.connect()?,
            };
            // On failure the socket is dropped so the next call reconnects.
            socket.send(&bytes)?;
            channel.socket = Some(socket);
            return Ok(());
        }

        let mut message_id = [0u8; MESSAGE_ID_SIZE];
        channel.rng.fill(&mut message_id);
        let Some(datagrams) = chunk_datagrams(&bytes, message_id) else {
            warn!(
                "dropping {} byte message: chunked GELF allows at most {MAX_CHUNK_COUNT} chunks",
                bytes.len()
            );
            return Ok(());
        };

        let socket = match channel.socket.take() {
            Some(socket) => socket,
            None => self.connect()?,
        };
        for datagram in &datagrams {
            socket.send(datagram)?;
        }
        channel.socket = Some(socket);
        Ok(())
    }

    fn close(&self) -> Result<(), TransmitError> {
        self.channel.lock().socket.take();
        Ok(())
    }
}

/// Split an oversized message into chunked-GELF datagrams.
///
/// Returns `None` when the message would need more than
/// [`MAX_CHUNK_COUNT`] chunks, in which case nothing may be sent.
fn chunk_datagrams(bytes: &[u8], message_id: [u8; MESSAGE_ID_SIZE]) -> Option<Vec<Vec<u8>>> {
    let count = bytes.len().div_ceil(CHUNK_DATA_SIZE);
    if count > MAX_CHUNK_COUNT {
        return None;
    }
    let datagrams = bytes
        .chunks(CHUNK_DATA_SIZE)
        .enumerate()
        .map(|(index, slice)| {
            let mut datagram = Vec::with_capacity(CHUNK_HEADER_SIZE + slice.len());
            datagram.extend_from_slice(&CHUNKED_MAGIC);
            datagram.extend_from_slice(&message_id);
            datagram.push(index as u8);
            datagram.push(count as u8);
            datagram.extend_from_slice(slice);
            datagram
        })
        .collect();
    Some(datagrams)
}

fn compress(bytes: &[u8], level: u32) -> Result<Vec<u8>, TransmitError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(bytes.len()), Compression::new(level));
    encoder.write_all(bytes).map_err(TransmitError::Compress)?;
    encoder.finish().map_err(TransmitError::Compress)
}
