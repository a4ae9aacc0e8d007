//! Byte source abstractions for parser.
//!
//! This module provides the [ByteSource] trait and the in-memory
//! implementation [InMemoryByteSource] used by all text readers of this
//! crate (segment files, Newick strings, rate tables are all small enough
//! to be held in memory).

use std::fs::File;
use std::io::Read;
use std::path::Path;

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================#=
/// Trait defining the interface for byte sources used by [ByteParser](crate::parser::ByteParser).
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn peek(&self) -> Option<u8>;

    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns the current position in the byte stream.
    fn position(&self) -> usize;

    /// Sets the position in the byte stream.
    ///
    /// # Arguments
    /// * `pos` - The byte offset to seek to
    fn set_position(&mut self, pos: usize);

    /// Returns a slice of bytes from a start position to the current position.
    ///
    /// # Returns
    /// A byte slice from `start` to the current position, or `None` if `start`
    /// lies after the current position
    fn slice_from(&self, start: usize) -> Option<&[u8]>;

    /// Returns a slice of up to `k` bytes from the current position without allocating.
    fn peek_slice(&self, k: usize) -> &[u8];

    /// Check if at end of data.
    fn is_eof(&self) -> bool;
}

// =#========================================================================#=
// IN MEMORY BYTE SOURCE
// =#========================================================================#=
/// An in-memory byte source that owns its data.
pub struct InMemoryByteSource {
    /// The owned byte data being parsed
    input: Vec<u8>,
    /// Current position in the byte slice
    pos: usize,
}

impl InMemoryByteSource {
    /// Creates a new in-memory byte source from a Vec of bytes.
    ///
    /// # Arguments
    /// * `bytes` - The byte vector to parse
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            input: bytes,
            pos: 0,
        }
    }

    /// Reads the entire file at `path` into a new in-memory byte source.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<InMemoryByteSource> {
        let mut contents = Vec::new();
        let mut file = File::open(path)?;
        file.read_to_end(&mut contents)?;
        Ok(Self::from_vec(contents))
    }
}

impl ByteSource for InMemoryByteSource {
    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline(always)]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    fn slice_from(&self, start: usize) -> Option<&[u8]> {
        if start <= self.pos && self.pos <= self.input.len() {
            Some(&self.input[start..self.pos])
        } else {
            None
        }
    }

    #[inline(always)]
    fn peek_slice(&self, k: usize) -> &[u8] {
        let start = self.pos.min(self.input.len());
        let end = (self.pos + k).min(self.input.len());
        &self.input[start..end]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_next() {
        let mut source = InMemoryByteSource::from_vec(b"ab".to_vec());
        assert_eq!(source.peek(), Some(b'a'));
        assert_eq!(source.next_byte(), Some(b'a'));
        assert_eq!(source.next_byte(), Some(b'b'));
        assert_eq!(source.next_byte(), None);
        assert!(source.is_eof());
    }

    #[test]
    fn test_slice_from() {
        let mut source = InMemoryByteSource::from_vec(b"0 1 (A,B);".to_vec());
        source.set_position(4);
        assert_eq!(source.slice_from(0), Some(&b"0 1 "[..]));
        assert_eq!(source.slice_from(5), None);
        assert_eq!(source.peek_slice(3), b"(A,");
    }
}
