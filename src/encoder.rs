//! GELF JSON wire encoding.
//!
//! GELF requires conditional field emission: the mandatory `version`,
//! `host` and `short_message` fields always appear, every optional field is
//! omitted entirely when unset, and additional fields follow with a `_`
//! prefix. A manual [`Serialize`] impl keeps that order and omission logic
//! in one place; `serde_json` writes map entries in the order they are
//! serialised, so the output is deterministic for an unchanged payload.

use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

use crate::payload::Payload;

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("version", self.version())?;
        map.serialize_entry("host", self.host())?;
        let buffer = self.short_message_buffer();
        if buffer.is_empty() {
            map.serialize_entry("short_message", self.short_message())?;
        } else {
            let text = std::str::from_utf8(buffer)
                .map_err(|_| S::Error::custom("short message buffer is not valid UTF-8"))?;
            map.serialize_entry("short_message", text)?;
        }
        if !self.full_message().is_empty() {
            map.serialize_entry("full_message", self.full_message())?;
        }
        if self.timestamp() > 0.0 {
            map.serialize_entry("timestamp", &self.timestamp())?;
        }
        if self.level() > 0 {
            map.serialize_entry("level", &self.level())?;
        }
        if !self.facility().is_empty() {
            map.serialize_entry("facility", self.facility())?;
        }
        if self.line() > 0 {
            map.serialize_entry("line", &self.line())?;
        }
        if !self.file().is_empty() {
            map.serialize_entry("file", self.file())?;
        }
        for (name, value) in self.additional_fields() {
            map.serialize_entry(&format!("_{name}"), value)?;
        }
        map.end()
    }
}

/// Encode a payload into its GELF JSON byte representation.
pub fn encode(payload: &Payload) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(payload)
}
