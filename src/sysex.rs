//! Sysex framing and the Matrix 1000 nibble codec
//!
//! The Matrix 1000 packs every data byte into two 4-bit nibbles (low nibble
//! first) and appends a 7-bit additive checksum of the unpacked bytes.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Sysex start marker
pub const SYSEX_START: u8 = 0xF0;
/// Sysex end marker
pub const SYSEX_END: u8 = 0xF7;

/// One framed sysex message.
///
/// Holds the bytes between the start and end markers: manufacturer id,
/// device family, command byte and payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SysexMessage {
    data: Vec<u8>,
}

impl SysexMessage {
    /// Wrap an unframed payload
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Parse one complete message including its F0/F7 markers
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::Framing(format!(
                "message of {} bytes is too short",
                bytes.len()
            )));
        }
        if bytes[0] != SYSEX_START {
            return Err(Error::Framing(format!(
                "invalid sysex start 0x{:02X}",
                bytes[0]
            )));
        }
        if bytes[bytes.len() - 1] != SYSEX_END {
            return Err(Error::Framing(format!(
                "invalid sysex end 0x{:02X}",
                bytes[bytes.len() - 1]
            )));
        }

        let data = &bytes[1..bytes.len() - 1];
        if let Some(pos) = data.iter().position(|&b| b & 0x80 != 0) {
            return Err(Error::Framing(format!(
                "status byte 0x{:02X} inside sysex at offset {}",
                data[pos],
                pos + 1
            )));
        }

        Ok(Self::new(data.to_vec()))
    }

    /// Payload between the markers
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of payload bytes (markers excluded)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the message carries no payload
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Framed bytes ready to be sent, markers included
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() + 2);
        bytes.push(SYSEX_START);
        bytes.extend_from_slice(&self.data);
        bytes.push(SYSEX_END);
        bytes
    }
}

/// Concatenate framed messages, e.g. to write a `.syx` file
pub fn messages_to_bytes(messages: &[SysexMessage]) -> Vec<u8> {
    messages.iter().flat_map(|m| m.to_bytes()).collect()
}

/// Read a `.syx` file and split it into messages
pub fn parse_sysex_file<P: AsRef<Path>>(filename: P) -> Result<Vec<SysexMessage>> {
    let data = fs::read(filename.as_ref())?;
    log::debug!(
        "SYSEX: read {} bytes from '{}'",
        data.len(),
        filename.as_ref().display()
    );
    parse_sysex_data(&data)
}

/// Split a byte stream into sysex messages.
///
/// Bytes outside of F0...F7 are skipped. Messages with a stray status byte in
/// their payload are dropped with a warning; a message that never terminates
/// is an error.
pub fn parse_sysex_data(data: &[u8]) -> Result<Vec<SysexMessage>> {
    if data.is_empty() {
        return Err(Error::Framing("empty sysex data".to_string()));
    }

    let mut messages = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        // Find SYSEX start
        while pos < data.len() && data[pos] != SYSEX_START {
            pos += 1;
        }

        if pos >= data.len() {
            break;
        }

        // Find SYSEX end
        let start = pos;
        pos += 1;
        while pos < data.len() && data[pos] != SYSEX_END {
            pos += 1;
        }

        if pos >= data.len() {
            return Err(Error::Framing(format!(
                "unterminated sysex message at offset {}",
                start
            )));
        }

        pos += 1; // Skip SYSEX_END

        match SysexMessage::from_bytes(&data[start..pos]) {
            Ok(message) => messages.push(message),
            Err(e) => log::warn!("SYSEX: skipping message at offset {}: {}", start, e),
        }
    }

    Ok(messages)
}

/// Pack bytes into low/high nibble pairs followed by the 7-bit checksum.
pub fn escape_sysex(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len() * 2 + 1);
    let mut checksum: u8 = 0;
    for &byte in data {
        checksum = checksum.wrapping_add(byte);
        result.push(byte & 0x0f);
        result.push((byte & 0xf0) >> 4);
    }
    result.push(checksum & 0x7f);
    result
}

/// Unpack nibble pairs and verify the trailing checksum.
///
/// Returns an empty vector if the checksum does not match or if there is no
/// checksum slot. Even-length input is rejected on purpose instead of being
/// passed through unverified. An empty result always means failure, never a
/// zero-length patch.
pub fn unescape_sysex(sysex: &[u8]) -> Vec<u8> {
    if sysex.len() % 2 == 0 {
        log::warn!(
            "SYSEX: {} nibble bytes leave no checksum slot, discarding",
            sysex.len()
        );
        return Vec::new();
    }

    let (nibbles, trailer) = sysex.split_at(sysex.len() - 1);
    let mut result = Vec::with_capacity(nibbles.len() / 2);
    let mut checksum: u8 = 0;
    for pair in nibbles.chunks_exact(2) {
        let byte = pair[0] | (pair[1] << 4);
        checksum = checksum.wrapping_add(byte);
        result.push(byte);
    }

    // The wire byte is compared unmasked, a set top bit can never match
    if trailer[0] != checksum & 0x7f {
        log::warn!(
            "SYSEX: checksum mismatch, expected 0x{:02X} got 0x{:02X}",
            checksum & 0x7f,
            trailer[0]
        );
        return Vec::new();
    }

    result
}
