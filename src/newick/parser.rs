//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which parses single
//! Newick strings or all Newick strings of a source into [PhyloTree]s.

use crate::model::{BranchLength, PhyloTree, VertexIndex};
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for single/multiple Newick format phylogenetic trees.
///
/// Unlike many Newick readers, vertices may have any number of children and
/// may carry labels after their closing parenthesis (e.g. support values).
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Number of leaves of trees to parse, used to pre-allocate;
///       otherwise it is inferred from the first parsed tree.
///
/// # Example
/// ```
/// use segsim::newick::NewickParser;
/// use segsim::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((Kiwi:1.0,Weka:1.0):0.5,Kakapo:1.5);");
/// let tree = NewickParser::new().parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.leaf_names(), vec!["Kiwi", "Weka", "Kakapo"]);
/// ```
pub struct NewickParser {
    know_num_leaves: bool,
    num_leaves: usize,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] with an unknown number of leaves.
    pub fn new() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
        }
    }

    /// Sets the expected number of leaves in each parsed tree.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    pub fn parse_all<B: ByteSource>(
        &mut self,
        mut byte_parser: ByteParser<B>,
    ) -> Result<Vec<PhyloTree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser], consuming
    /// the terminating semicolon.
    ///
    /// # Errors
    /// Returns a [ParsingError] if the Newick format is invalid.
    pub fn parse_str<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<PhyloTree, ParsingError> {
        let mut tree = PhyloTree::new(self.num_leaves);

        self.parse_root(parser, &mut tree)?;

        if !self.know_num_leaves {
            self.num_leaves = tree.num_leaves();
            self.know_num_leaves = true;
        }

        Ok(tree)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[label][:branch_length];`
    fn parse_root<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut PhyloTree,
    ) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let children = self.parse_children(parser, tree)?;
        let label = self.parse_internal_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        tree.add_root(children, branch_length, label);

        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index.
    fn parse_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut PhyloTree,
    ) -> Result<VertexIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            self.parse_internal_vertex(parser, tree)
        } else {
            self.parse_leaf(parser, tree)
        }
    }

    /// Parses internal vertex `(children)[label][:branch_length]`,
    /// adds it to tree, and returns its index.
    fn parse_internal_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut PhyloTree,
    ) -> Result<VertexIndex, ParsingError> {
        let children = self.parse_children(parser, tree)?;
        let label = self.parse_internal_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        Ok(tree.add_internal(children, branch_length, label))
    }

    /// Parses comma-separated children `(child, child, ...)` and returns their indices.
    ///
    /// Expects parser at opening `(` (caller should skip comments/whitespace).
    fn parse_children<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut PhyloTree,
    ) -> Result<Vec<VertexIndex>, ParsingError> {
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = vec![self.parse_vertex(parser, tree)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b',') {
                children.push(self.parse_vertex(parser, tree)?);
            } else if parser.consume_if(b')') {
                return Ok(children);
            } else if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            } else {
                let next_char = parser.peek().map(char::from);
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' after child but found {:?}", next_char),
                ));
            }
        }
    }

    /// Parses leaf vertex `label[:branch_length]` and adds it to tree.
    fn parse_leaf<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut PhyloTree,
    ) -> Result<VertexIndex, ParsingError> {
        let name = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if name.is_empty() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Leaf without label".to_string(),
            ));
        }
        let branch_length = self.parse_branch_length(parser)?;

        Ok(tree.add_leaf(branch_length, name))
    }

    /// Parses the optional label following a closing parenthesis.
    fn parse_internal_label<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<String>, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok((!label.is_empty()).then_some(label))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - [BranchLength] if found branch length and was able to parse it
    /// - `None` if found no branch length
    /// - [ParsingError] if it couldn't parse the value or it is negative
    fn parse_branch_length<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(b as char);
                parser.next();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {}", branch_length_str),
            )
        })?;

        BranchLength::try_new(value).map(Some).ok_or_else(|| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Branch length must be non-negative and finite, got {}", value),
            )
        })
    }
}
