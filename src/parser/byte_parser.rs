//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for parsing text-based input with support
//! for peeking, consuming, and quote-aware label parsing. Used as the
//! foundation for the segment file reader and the Newick parser.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

/// Whitespace bytes: space, tab, newline, carriage return
const WHITESPACE: &[u8] = b" \t\n\r";

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for ASCII text with support for peeking, consuming, and pattern matching.
///
/// # Features
/// - Works with any [ByteSource]
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes with escaping)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use segsim::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("0.0 0.5 (A:1,B:1);");
/// assert_eq!(parser.parse_token(), "0.0");
/// parser.skip_whitespace();
/// assert_eq!(parser.parse_token(), "0.5");
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new `ByteParser` from a string by copying it into a Vec.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }

    /// Creates a new `ByteParser` by reading the whole file into memory.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read.
    pub fn from_file_in_memory<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if WHITESPACE.contains(&b) {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) the rest of the current line, including the newline.
    pub fn skip_line(&mut self) {
        self.consume_until(b'\n', ConsumeMode::Inclusive);
    }

    /// Skips (consumes) a bracket comment `[...]` if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    ///
    /// # Errors
    /// Returns an error if a comment starts with `[` but doesn't have a closing `]`.
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']', ConsumeMode::Inclusive) {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips (consumes) all consecutive whitespace and bracket comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte matches the target byte (case-insensitive for ASCII).
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek()
            .is_some_and(|b| b.eq_ignore_ascii_case(&ch))
    }

    /// Consumes the current byte if it matches the target byte (case-insensitive).
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.next();
                }
                return true;
            }
            self.next();
        }
        false // reached EOF without finding target
    }

    /// Parses a whitespace-delimited token, e.g. a numeric field.
    ///
    /// Does not skip leading whitespace; returns an empty string if the parser
    /// is positioned at whitespace or EOF.
    pub fn parse_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(b) = self.peek() {
            if WHITESPACE.contains(&b) {
                break;
            }
            token.push(b as char);
            self.next();
        }
        token
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current parser position in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Sets the position in the byte stream.
    pub fn set_position(&mut self, pos: usize) {
        self.source.set_position(pos);
    }

    /// Returns a slice of the input from a start position to the current position.
    ///
    /// # Returns
    /// A byte slice from `start` to the current position, or empty slice if not available
    pub fn slice_from(&self, start: usize) -> &[u8] {
        self.source.slice_from(start).unwrap_or(&[])
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(self.source.peek_slice(k)).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Skips leading whitespace and comments, then dispatches on whether
    /// the label starts with a single quote.
    ///
    /// # Errors
    /// Returns an error if a comment or a quoted label is not closed
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a quoted label enclosed in single quotes with escape support.
    ///
    /// Assumes the opening quote has not been consumed yet. Single quotes within
    /// the label are escaped by doubling them (e.g., `'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Errors
    /// Returns an error if the quoted label is not properly closed
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next(); // consume opening '

        let mut label = String::new();
        loop {
            match self.next() {
                Some(b'\'') => {
                    // Two single quotes in a row are an escaped quote
                    if self.peek() == Some(b'\'') {
                        label.push('\'');
                        self.next();
                    } else {
                        return Ok(label);
                    }
                }
                Some(b) => label.push(b as char),
                None => return Err(ParsingError::unexpected_eof(self)),
            }
        }
    }

    /// Parses an unquoted label until any of the given delimiters is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let mut label = String::new();

        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            label.push(b as char);
            self.next();
        }

        label
    }
}

/// Specifies whether to consume or leave the target when using `consume_until`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}
