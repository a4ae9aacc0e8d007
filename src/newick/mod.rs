//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse Newick format strings
//! into [`PhyloTree`]s, and [`to_newick`] to write them back.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string, returns a [`PhyloTree`]
//! * [`parse_file`] - parses a file of semicolon-separated Newick strings
//!
//! # Format
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex {',' vertex} ')' [label] [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Labels may be single-quoted, with `''` escaping a quote
//! * Comments are square brackets and can occur anywhere where whitespace is allowed

mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::PhyloTree;
use crate::parser::ByteParser;
use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`PhyloTree`].
///
/// # Example
/// ```
/// use segsim::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    let tree = NewickParser::new().parse_str(&mut byte_parser)?;

    byte_parser.skip_comment_and_whitespace()?;
    if !byte_parser.is_eof() {
        return Err(ParsingError::invalid_newick_string(
            &byte_parser,
            "Unexpected content after terminating ';'".to_string(),
        ));
    }

    Ok(tree)
}

/// Parses a file containing a semicolon-separated list of Newick strings.
///
/// # Errors
/// Returns a [`ParsingError`] if file reading fails or Newick format is invalid.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<PhyloTree>, ParsingError> {
    let byte_parser = ByteParser::from_file_in_memory(path)?;
    NewickParser::new().parse_all(byte_parser)
}
