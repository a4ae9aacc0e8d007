//! Segmented trees: sub-ranges of the simulated sequence, each governed by
//! its own tree.
//!
//! A segment file lists records `begin end newick;`, where `begin` and `end`
//! are relative positions in `[0, 1]`. Consecutive segments must touch
//! (`begin` of one equals `end` of the previous), the first one starts at 0
//! and the last one ends at 1. All trees share the same set of leaf names.
//!
//! # Components
//! * [reader::SegmentRecordReader] - reads raw `(begin, end, tree text)` records
//! * [validator::validate] - checks leaf-set consistency and contiguity
//! * [mapper::SiteAllocation] - turns boundaries into absolute site ranges
//!
//! # Quick API
//! * [parse_str] / [parse_file] - read, parse and validate a segment file
//!
//! # Example
//! ```
//! use segsim::segments;
//!
//! let segment_set = segments::parse_str(
//!     "# recombination at 30%\n\
//!      0 0.3 ((Kea:1,Kaka:1):1,Kakapo:2);\n\
//!      0.3 1 (Kea:1,(Kaka:0.5,Kakapo:0.5):0.5);\n",
//! )
//! .unwrap();
//! assert_eq!(segment_set.len(), 2);
//! assert_eq!(segment_set.boundaries(), vec![0.0, 0.3, 1.0]);
//! ```

pub mod mapper;
pub mod reader;
pub mod validator;

pub use self::mapper::SiteAllocation;
pub use self::reader::{SegmentRecord, SegmentRecordReader};

use crate::error::{SegSimError, StructuralError};
use crate::model::PhyloTree;
use crate::parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use std::path::Path;

// =#========================================================================#=
// SEGMENT
// =#========================================================================#=
/// A contiguous sub-range `[begin, end]` of the unit interval with its tree.
#[derive(Debug, Clone)]
pub struct Segment {
    begin: f64,
    end: f64,
    tree: PhyloTree,
}

impl Segment {
    /// Creates a new segment; positions are not checked here,
    /// see [validator::validate].
    pub fn new(begin: f64, end: f64, tree: PhyloTree) -> Self {
        Self { begin, end, tree }
    }

    pub fn begin(&self) -> f64 {
        self.begin
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn tree(&self) -> &PhyloTree {
        &self.tree
    }
}

// =#========================================================================#=
// SEGMENT SET
// =#========================================================================#=
/// Validated, ordered sequence of [Segment]s covering `[0, 1]`.
///
/// Can only be obtained through [SegmentSet::new] (which validates) or
/// [SegmentSet::single], so holding a `SegmentSet` means the structural
/// checks have passed.
#[derive(Debug, Clone)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    /// Validates the given segments and wraps them.
    ///
    /// # Errors
    /// Returns the first [StructuralError] found, see [validator::validate].
    pub fn new(segments: Vec<Segment>) -> Result<Self, StructuralError> {
        validator::validate(&segments)?;
        Ok(Self { segments })
    }

    /// Creates the implicit single segment `[0, 1]` of single-tree mode.
    ///
    /// # Errors
    /// Returns [StructuralError::DuplicateLeafName] if the tree repeats a leaf name.
    pub fn single(tree: PhyloTree) -> Result<Self, StructuralError> {
        Self::new(vec![Segment::new(0.0, 1.0, tree)])
    }

    /// Number of segments (at least 1).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`, since validation rejects empty segment lists.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Returns the ordered boundaries `[begin_0, end_0, end_1, ..., end_n-1]`,
    /// i.e. one more than the number of segments.
    pub fn boundaries(&self) -> Vec<f64> {
        let mut boundaries = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            boundaries.push(first.begin);
        }
        boundaries.extend(self.segments.iter().map(|s| s.end));
        boundaries
    }

    /// Leaf names of the first tree in pre-order; shared by all trees.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.segments
            .first()
            .map(|s| s.tree.leaf_names())
            .unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Reads, parses and validates segments from a string.
///
/// # Errors
/// * [SegSimError::Parse] for malformed records or tree text
/// * [SegSimError::Structural] if the segments do not form a valid set
pub fn parse_str<S: AsRef<str>>(input: S) -> Result<SegmentSet, SegSimError> {
    let reader = SegmentRecordReader::new(ByteParser::for_str(input.as_ref()));
    from_reader(reader)
}

/// Reads, parses and validates segments from a file.
///
/// # Errors
/// As [parse_str], plus [SegSimError::Io] if the file cannot be read.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SegmentSet, SegSimError> {
    let byte_parser = ByteParser::from_file_in_memory(path)?;
    from_reader(SegmentRecordReader::new(byte_parser))
}

fn from_reader<B: ByteSource>(
    mut reader: SegmentRecordReader<B>,
) -> Result<SegmentSet, SegSimError> {
    let mut segments = Vec::new();
    while let Some(record) = reader.next_record()? {
        let tree = record.parse_tree()?;
        segments.push(Segment::new(record.begin(), record.end(), tree));
    }
    log::info!("Read {} segment(s)", segments.len());

    let segment_set = SegmentSet::new(segments)?;
    log::debug!(
        "Segment trees share {} leaves, boundaries {:?}",
        segment_set.leaf_names().len(),
        segment_set.boundaries()
    );
    Ok(segment_set)
}
