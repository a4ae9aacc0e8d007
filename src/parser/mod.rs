//! Basic low-level byte parser functionality.
//!
//! Shared infrastructure of the segment file reader and the Newick parser:
//! a byte source, a byte parser, and [ParsingError].

pub mod byte_parser;
pub mod byte_source;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::{ByteParser, ConsumeMode};
pub use parsing_error::{ParsingError, ParsingErrorType};
