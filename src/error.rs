//! Error types of the simulation pipeline.
//!
//! Text-level problems are reported as [ParsingError] (see
//! [crate::parser::parsing_error]); everything found after parsing has its
//! own error enum here, all wrapped by [SegSimError]. No error is retried:
//! each of them describes an input problem that a second attempt would
//! not fix.

use crate::parser::ParsingError;
use thiserror::Error;

/// Violations of the segment structure, detected before any simulation.
///
/// Each variant carries the index of the offending segment (0-based, in
/// file order), except [StructuralError::NoSegments].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("no segments given")]
    NoSegments,

    #[error("segment {index}: position {value} outside of [0, 1]")]
    BoundaryOutOfRange { index: usize, value: f64 },

    #[error("segment {index}: begins at {begin} after its end {end}")]
    ReversedSegment { index: usize, begin: f64, end: f64 },

    #[error("segment {index}: segments do not match, begins at {begin} but previous segment ends at {previous_end}")]
    BoundaryGap { index: usize, begin: f64, previous_end: f64 },

    #[error("segment {index}: last segment ends at {end} instead of 1")]
    IncompleteCoverage { index: usize, end: f64 },

    #[error("segment {index}: leaf name '{name}' occurs more than once")]
    DuplicateLeafName { index: usize, name: String },

    #[error("segment {index}: leaf names differ from those of the first tree (missing: {missing:?}, unexpected: {unexpected:?})")]
    LeafSetMismatch {
        index: usize,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("segment {index}: tree has a branch without length")]
    MissingBranchLength { index: usize },
}

impl StructuralError {
    /// Returns the index of the offending segment, if any.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            StructuralError::NoSegments => None,
            StructuralError::BoundaryOutOfRange { index, .. }
            | StructuralError::ReversedSegment { index, .. }
            | StructuralError::BoundaryGap { index, .. }
            | StructuralError::IncompleteCoverage { index, .. }
            | StructuralError::DuplicateLeafName { index, .. }
            | StructuralError::LeafSetMismatch { index, .. }
            | StructuralError::MissingBranchLength { index } => Some(*index),
        }
    }
}

/// Problems with the content of a rate table.
///
/// Rows are counted from 0, excluding the header, so a row number is
/// also the absolute index of the site it annotates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("rate table is empty")]
    EmptyTable,

    #[error("rate table has no column named '{column}'")]
    MissingColumn { column: String },

    #[error("rate table row {row}: no value in column '{column}'")]
    MissingField { row: usize, column: String },

    #[error("rate table row {row}: cannot read '{value}' as a rate")]
    InvalidRate { row: usize, value: String },
}

/// Post-simulation mismatches between sequence blocks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyError {
    #[error("segment {segment}: sequence identifiers differ from those of the first segment (missing: {missing:?}, unexpected: {unexpected:?})")]
    IdentifierMismatch {
        segment: usize,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("segment {segment}: sequence '{identifier}' occurs more than once")]
    DuplicateIdentifier { segment: usize, identifier: String },

    #[error("segment {segment}: sequence '{identifier}' has {actual} sites, expected {expected}")]
    LengthMismatch {
        segment: usize,
        identifier: String,
        expected: usize,
        actual: usize,
    },

    #[error("{segments} segments but site allocation has {ranges} ranges")]
    AllocationMismatch { segments: usize, ranges: usize },

    #[error("rate table has {available} rows, sites [{start}, {end}) requested")]
    RateTableTooShort {
        start: usize,
        end: usize,
        available: usize,
    },
}

/// Failures of a sequence simulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    #[error("vertex {vertex} has no branch length")]
    MissingBranchLength { vertex: usize },

    #[error("site {site}: rate {rate} is negative or not finite")]
    InvalidRate { site: usize, rate: f64 },

    #[error("alphabet with {size} states cannot be simulated")]
    AlphabetTooSmall { size: usize },
}

/// Invalid combination of configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("number of sites must be positive")]
    NoSites,

    #[error("gamma shape must be positive and finite, got {0}")]
    InvalidGammaShape(f64),

    #[error("tagged tree output requires single-tree input")]
    TaggedTreeRequiresSingleTree,

    #[error("rate column name must not be empty")]
    EmptyRateColumn,

    #[error("unknown alphabet '{0}' (expected DNA, RNA or Protein)")]
    UnknownAlphabet(String),

    #[error("tree file contains no tree")]
    NoTree,
}

/// Any error of the simulation pipeline.
#[derive(Debug, Error)]
pub enum SegSimError {
    #[error(transparent)]
    Parse(#[from] ParsingError),

    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("simulation failed: {0}")]
    Simulator(#[from] SimulatorError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
