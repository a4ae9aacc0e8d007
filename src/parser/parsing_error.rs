//! Error types for the text readers.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while reading segment files, Newick strings
//! and rate tables.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use std::error::Error;
use std::fmt;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur during parsing.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    IoError(String),
    UnexpectedEOF,
    UnclosedComment,
    /// A segment record lacks its begin or end field
    MalformedRecord(String),
    /// A field that should be numeric could not be parsed
    InvalidNumber(String),
    /// The terminating `;` of a tree was never found
    UnterminatedTree,
    InvalidNewickString(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and surrounding bytes).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &ByteParser<S>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnexpectedEOF
    pub fn unexpected_eof<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedEOF, parser)
    }

    /// Convenience constructor for UnclosedComment
    pub fn unclosed_comment<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedComment, parser)
    }

    /// Convenience constructor for MalformedRecord
    pub fn malformed_record<S: ByteSource>(parser: &ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::MalformedRecord(msg), parser)
    }

    /// Convenience constructor for InvalidNumber
    pub fn invalid_number<S: ByteSource>(parser: &ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidNumber(msg), parser)
    }

    /// Convenience constructor for UnterminatedTree
    pub fn unterminated_tree<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnterminatedTree, parser)
    }

    /// Convenience constructor for InvalidNewickString
    pub fn invalid_newick_string<S: ByteSource>(parser: &ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidNewickString(msg), parser)
    }

    /// Create a ParsingError without parser context
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self { kind, position: 0, context: String::new() }
    }

    /// Shifts the reported position by `offset`, e.g. when a tree string
    /// was parsed separately from the file it was read from.
    pub(crate) fn offset_by(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ParsingErrorType::IoError(msg) => write!(f, "IO error - {msg}")?,
            ParsingErrorType::UnexpectedEOF => write!(f, "Unexpected end of file")?,
            ParsingErrorType::UnclosedComment => write!(f, "Unclosed comment")?,
            ParsingErrorType::MalformedRecord(msg) => write!(f, "Malformed segment record - {msg}")?,
            ParsingErrorType::InvalidNumber(msg) => write!(f, "Invalid number - {msg}")?,
            ParsingErrorType::UnterminatedTree => write!(f, "Incomplete tree, terminating ';' not found")?,
            ParsingErrorType::InvalidNewickString(msg) => write!(f, "Invalid newick string: {msg}")?,
        }

        // IO errors carry no position
        if matches!(self.kind, ParsingErrorType::IoError(_)) {
            return Ok(());
        }

        write!(f, " at position {}", self.position)?;

        if !self.context.is_empty() {
            write!(f, "\n  Context (next {} bytes): {}", self.context.len(), self.context)?;
        }

        Ok(())
    }
}

impl Error for ParsingError {}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError::without_context(ParsingErrorType::IoError(err.to_string()))
    }
}
