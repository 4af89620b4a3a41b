//! GELF message payload.
//!
//! This module defines the [`Payload`] record that captures one log event in
//! the shape the GELF wire format expects: the mandatory `version`, `host`
//! and short message, the optional timestamp, syslog level and legacy
//! fields, and any number of `_`-prefixed additional fields.
//!
//! A `Payload` is owned by the thread that populates and sends it. Callers
//! that recycle payloads between events reset them with [`Payload::clear`],
//! which keeps the owned buffers allocated; constructing a fresh value per
//! message is equally correct.

use std::collections::BTreeMap;

/// One GELF log message, populated field by field before transmission.
#[derive(Clone, Debug, Default)]
pub struct Payload {
    version: String,
    host: String,
    short_message: String,
    full_message: String,
    timestamp: f64,
    level: u8,
    facility: String,
    line: u32,
    file: String,
    additional_fields: BTreeMap<String, String>,
    // Pre-encoded UTF-8 form of the short message. Non-empty wins over
    // `short_message` during encoding.
    short_message_buffer: Vec<u8>,
}

impl Payload {
    /// Create an empty payload with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// GELF protocol version string, e.g. `"1.1"`. Mandatory.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Name of the host, source or application that sent this message.
    /// Mandatory.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Short descriptive message. Mandatory unless the pre-encoded buffer is
    /// set.
    pub fn short_message(&self) -> &str {
        &self.short_message
    }

    pub fn set_short_message(&mut self, short_message: impl Into<String>) {
        self.short_message = short_message.into();
    }

    /// Long message body, typically a backtrace. Optional.
    pub fn full_message(&self) -> &str {
        &self.full_message
    }

    pub fn set_full_message(&mut self, full_message: impl Into<String>) {
        self.full_message = full_message.into();
    }

    /// Seconds since the UNIX epoch with optional decimal places. Zero means
    /// unset and is omitted from the wire.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: f64) {
        self.timestamp = timestamp;
    }

    /// Syslog severity 0-7. Zero means unset and is omitted from the wire.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    /// Facility that sent the message. Optional, deprecated by GELF 1.1.
    pub fn facility(&self) -> &str {
        &self.facility
    }

    pub fn set_facility(&mut self, facility: impl Into<String>) {
        self.facility = facility.into();
    }

    /// Source line that caused the message. Optional, deprecated; zero means
    /// unset.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn set_line(&mut self, line: u32) {
        self.line = line;
    }

    /// Source file that caused the message. Optional, deprecated.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn set_file(&mut self, file: impl Into<String>) {
        self.file = file.into();
    }

    /// Attach an additional field, serialised with a leading underscore.
    ///
    /// Key names must match `^[\w.-]*$`; [`check_valid`](crate::check_valid)
    /// rejects payloads carrying any other key before transmission.
    pub fn add_additional_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.additional_fields.insert(name.into(), value.into());
    }

    pub fn additional_fields(&self) -> &BTreeMap<String, String> {
        &self.additional_fields
    }

    /// Pre-encoded UTF-8 bytes of the short message.
    pub fn short_message_buffer(&self) -> &[u8] {
        &self.short_message_buffer
    }

    /// Replace the pre-encoded short message bytes, reusing the existing
    /// allocation where possible.
    pub fn set_short_message_buffer(&mut self, encoded: &[u8]) {
        self.short_message_buffer.clear();
        self.short_message_buffer.extend_from_slice(encoded);
    }

    /// Reset every field to its unset state without releasing the owned
    /// buffers, so the payload can be refilled for the next event.
    pub fn clear(&mut self) {
        self.version.clear();
        self.host.clear();
        self.short_message.clear();
        self.full_message.clear();
        self.timestamp = 0.0;
        self.level = 0;
        self.facility.clear();
        self.line = 0;
        self.file.clear();
        self.additional_fields.clear();
        self.short_message_buffer.clear();
    }
}
