//! Field-level codec: little-endian integers and 16-bit wide text.
//!
//! Wide text stores each UTF-16 code unit as two bytes, low byte first.
//! Length fields in the file count code units, not bytes or scalar values;
//! [`wide_len`] gives the number to write.
//!
//! Writers append to a caller-owned `Vec<u8>`. Reading goes through
//! [`Reader`], a forward-only cursor that reports the absolute offset of
//! every failure.

use crate::error::{FltError, Result};

/// Number of UTF-16 code units in `s`.
pub fn wide_len(s: &str) -> usize {
    s.encode_utf16().count()
}

pub fn put_u16_le(out: &mut Vec<u8>, n: u16) {
    out.extend_from_slice(&n.to_le_bytes());
}

pub fn put_u32_le(out: &mut Vec<u8>, n: u32) {
    out.extend_from_slice(&n.to_le_bytes());
}

/// Append `s` as (low byte, high byte) pairs, one per code unit.
pub fn put_wide_text(out: &mut Vec<u8>, s: &str) {
    out.reserve(wide_len(s) * 2);
    for unit in s.encode_utf16() {
        out.push((unit & 0xff) as u8);
        out.push((unit >> 8) as u8);
    }
}

pub fn encode_u16_le(n: u16) -> [u8; 2] {
    n.to_le_bytes()
}

pub fn encode_u32_le(n: u32) -> [u8; 4] {
    n.to_le_bytes()
}

pub fn encode_wide_text(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    put_wide_text(&mut out, s);
    out
}

pub fn decode_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    Reader::at(bytes, offset).u16_le()
}

pub fn decode_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    Reader::at(bytes, offset).u32_le()
}

/// Read `char_count` code units starting at `offset`.
pub fn decode_wide_text(bytes: &[u8], offset: usize, char_count: usize) -> Result<String> {
    Reader::at(bytes, offset).wide_text(char_count)
}

/// Forward-only cursor over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn at(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    /// Absolute position of the next unread byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    /// The next `n` bytes without consuming them, if that many remain.
    pub fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        self.bytes.get(self.offset..self.offset.checked_add(n)?)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.bytes(n).map(|_| ())
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let slice = self
            .peek_bytes(n)
            .ok_or_else(|| FltError::TruncatedInput {
                offset: self.offset,
                needed: n,
                available: self.remaining(),
            })?;
        self.offset += n;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16_le(&mut self) -> Result<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&mut self) -> Result<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read `char_count` wide characters.
    ///
    /// The whole span is bounds-checked before any allocation, so a bogus
    /// length field cannot trigger a huge reservation.
    pub fn wide_text(&mut self, char_count: usize) -> Result<String> {
        let start = self.offset;
        let byte_len = char_count.checked_mul(2).ok_or(FltError::TruncatedInput {
            offset: start,
            needed: usize::MAX,
            available: self.remaining(),
        })?;
        let raw = self.bytes(byte_len)?;
        let units = raw
            .chunks_exact(2)
            .map(|pair| (u16::from(pair[1]) << 8) | u16::from(pair[0]));
        char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|_| FltError::malformed("invalid UTF-16 text", start))
    }
}
