//! Pkt-line framing
//!
//! Each line is prefixed by a 4-hex-digit byte count that covers the prefix
//! itself; a zero-length prefix (`0000`) is a flush marker delimiting
//! sections of the stream.

use crate::errors::GitError;
use bytes::Bytes;

pub const FLUSH_PKT: &[u8] = b"0000";

/// Width of the hex length prefix
const PREFIX_LENGTH: usize = 4;

/// One parsed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PktLine {
    /// `0000` section delimiter
    Flush,
    /// Frame payload (length prefix stripped)
    Data(Bytes),
}

/// Append a payload framed with its length prefix
pub fn write_pkt_line(buffer: &mut Vec<u8>, payload: &str) {
    buffer.extend_from_slice(format!("{:04x}", payload.len() + PREFIX_LENGTH).as_bytes());
    buffer.extend_from_slice(payload.as_bytes());
}

/// Append a flush marker
pub fn write_flush(buffer: &mut Vec<u8>) {
    buffer.extend_from_slice(FLUSH_PKT);
}

/// Cursor-based reader over a framed buffer
pub struct PktLineReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> PktLineReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        PktLineReader { buffer, cursor: 0 }
    }

    /// Bytes not yet consumed by frame parsing
    pub fn remaining(&self) -> &'a [u8] {
        &self.buffer[self.cursor..]
    }

    /// Read the next frame, or `None` at the end of the buffer.
    pub fn next_line(&mut self) -> Result<Option<PktLine>, GitError> {
        if self.cursor == self.buffer.len() {
            return Ok(None);
        }

        let prefix = self
            .buffer
            .get(self.cursor..self.cursor + PREFIX_LENGTH)
            .ok_or_else(|| malformed("length prefix cut short"))?;
        let prefix = std::str::from_utf8(prefix)
            .map_err(|_| malformed("length prefix is not hex"))?;
        let length = usize::from_str_radix(prefix, 16)
            .map_err(|_| malformed("length prefix is not hex"))?;

        if length == 0 {
            self.cursor += PREFIX_LENGTH;
            return Ok(Some(PktLine::Flush));
        }
        if length < PREFIX_LENGTH {
            return Err(malformed("length prefix below minimum"));
        }

        let start = self.cursor + PREFIX_LENGTH;
        let end = self.cursor + length;
        let payload = self
            .buffer
            .get(start..end)
            .ok_or_else(|| malformed("payload cut short"))?;
        self.cursor = end;

        Ok(Some(PktLine::Data(Bytes::copy_from_slice(payload))))
    }
}

fn malformed(what: &str) -> GitError {
    GitError::TransportFailure(format!("malformed pkt-line: {what}"))
}
