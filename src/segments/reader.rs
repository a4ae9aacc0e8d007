//! Reading raw segment records `begin end newick;` from a byte source.

use crate::model::PhyloTree;
use crate::newick;
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

/// Marks a comment line when it is the first non-whitespace byte of a record.
const COMMENT_MARKER: u8 = b'#';

// =#========================================================================#=
// SEGMENT RECORD
// =#========================================================================#=
/// Raw record of a segment file: two positions and the unparsed tree text.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRecord {
    begin: f64,
    end: f64,
    tree_text: String,
    /// Byte position of `tree_text` in the source
    offset: usize,
}

impl SegmentRecord {
    pub fn begin(&self) -> f64 {
        self.begin
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Tree text including its terminating `;`.
    pub fn tree_text(&self) -> &str {
        &self.tree_text
    }

    /// Position of the tree text in the source, in bytes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Parses the tree text as Newick.
    ///
    /// # Errors
    /// Returns a [ParsingError] positioned relative to the whole source.
    pub fn parse_tree(&self) -> Result<PhyloTree, ParsingError> {
        newick::parse_str(&self.tree_text).map_err(|e| e.offset_by(self.offset))
    }
}

// =#========================================================================#=
// SEGMENT RECORD READER
// =#========================================================================#=
/// Reads [SegmentRecord]s one after the other.
///
/// A record consists of two whitespace-separated numbers followed by tree
/// text up to and including the next `;` that is neither quoted nor inside
/// a `[...]` comment. Records may span multiple lines. Blank lines and lines
/// starting with `#` between records are skipped.
///
/// # Example
/// ```
/// use segsim::parser::ByteParser;
/// use segsim::segments::SegmentRecordReader;
///
/// let mut reader = SegmentRecordReader::new(ByteParser::for_str(
///     "0 0.5 (Tui,\n  Bellbird);\n0.5 1 (Tui,Bellbird);",
/// ));
/// let records = reader.read_all().unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].tree_text(), "(Tui,\n  Bellbird);");
/// ```
pub struct SegmentRecordReader<B: ByteSource> {
    byte_parser: ByteParser<B>,
    num_records: usize,
}

impl<B: ByteSource> SegmentRecordReader<B> {
    pub fn new(byte_parser: ByteParser<B>) -> Self {
        Self { byte_parser, num_records: 0 }
    }

    /// Number of records read so far.
    pub fn num_records(&self) -> usize {
        self.num_records
    }

    /// Reads all remaining records in source order.
    pub fn read_all(&mut self) -> Result<Vec<SegmentRecord>, ParsingError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Reads the next record.
    ///
    /// # Returns
    /// * `Ok(Some(record))` if a record was read
    /// * `Ok(None)` if only whitespace and comment lines remained
    ///
    /// # Errors
    /// * [MalformedRecord](crate::parser::ParsingErrorType::MalformedRecord)
    ///   if the source ends before the end position or the tree text
    /// * [InvalidNumber](crate::parser::ParsingErrorType::InvalidNumber)
    ///   if a position is not a number
    /// * [UnterminatedTree](crate::parser::ParsingErrorType::UnterminatedTree)
    ///   if no terminating `;` follows the tree text
    pub fn next_record(&mut self) -> Result<Option<SegmentRecord>, ParsingError> {
        if !self.skip_to_record_start() {
            return Ok(None);
        }

        let begin = self.parse_position("begin")?;
        self.byte_parser.skip_whitespace();
        if self.byte_parser.is_eof() {
            return Err(ParsingError::malformed_record(
                &self.byte_parser,
                "Record ends after begin position, expected end position and tree".to_string(),
            ));
        }

        let end = self.parse_position("end")?;
        self.byte_parser.skip_whitespace();
        if self.byte_parser.is_eof() {
            return Err(ParsingError::malformed_record(
                &self.byte_parser,
                "Record ends after end position, expected tree".to_string(),
            ));
        }

        let offset = self.byte_parser.position();
        self.consume_tree_text(offset)?;
        let tree_text = String::from_utf8_lossy(self.byte_parser.slice_from(offset)).into_owned();

        self.num_records += 1;
        Ok(Some(SegmentRecord { begin, end, tree_text, offset }))
    }

    /// Skips whitespace, blank lines and comment lines.
    ///
    /// # Returns
    /// `true` if a record starts at the new position, `false` at EOF
    fn skip_to_record_start(&mut self) -> bool {
        loop {
            self.byte_parser.skip_whitespace();
            match self.byte_parser.peek() {
                None => return false,
                Some(COMMENT_MARKER) => self.byte_parser.skip_line(),
                Some(_) => return true,
            }
        }
    }

    /// Parses a whitespace-delimited position value.
    fn parse_position(&mut self, field: &str) -> Result<f64, ParsingError> {
        let start = self.byte_parser.position();
        let token = self.byte_parser.parse_token();
        token.parse::<f64>().map_err(|_| {
            self.byte_parser.set_position(start);
            ParsingError::invalid_number(
                &self.byte_parser,
                format!("Cannot read {} position '{}'", field, token),
            )
        })
    }

    /// Advances past the `;` ending the tree text that starts at `offset`.
    fn consume_tree_text(&mut self, offset: usize) -> Result<(), ParsingError> {
        let mut in_quotes = false;
        let mut comment_depth = 0usize;

        while let Some(b) = self.byte_parser.next() {
            match b {
                // a doubled quote inside a quoted label toggles twice
                b'\'' if comment_depth == 0 => in_quotes = !in_quotes,
                b'[' if !in_quotes => comment_depth += 1,
                b']' if !in_quotes && comment_depth > 0 => comment_depth -= 1,
                b';' if !in_quotes && comment_depth == 0 => return Ok(()),
                _ => {}
            }
        }

        self.byte_parser.set_position(offset);
        Err(ParsingError::unterminated_tree(&self.byte_parser))
    }
}
