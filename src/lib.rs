//! Segsim simulates sequence alignments along segmented trees, i.e. where
//! different parts of the sequence evolve along different trees, as after
//! recombination.
//!
//! Core functionality provided:
//! - Segments: Read segment files of records `begin end newick;` and check
//!   that all trees share their leaves and that the segments tile `[0, 1]`.
//! - Site allocation: Map relative segment boundaries to absolute site
//!   ranges that partition the alignment exactly.
//! - Rate tables: Optionally read per-site rates from a tab-separated
//!   file; its row count then fixes the number of sites.
//! - Simulation: Simulate each segment in order with a [SequenceSimulator]
//!   (e.g. the equal-rates [JukesCantorSimulator]) and concatenate the
//!   blocks per sequence into one alignment.
//! - Newick: Parse trees with any number of children per vertex, write them
//!   back, optionally tagged with vertex ids.
//! - FASTA: Write the alignment.
//!
//! Limitations:
//! - Only the equal-rates substitution model is built in; other models
//!   plug in through [SequenceSimulator]
//! - Segments are simulated sequentially
//!
//! # Usage patterns
//! 1. [simulate_segment_file] and [pipeline::run] cover the common runs.
//! 2. Compose the stages yourself from [segments], [rates] and
//!    [simulation], e.g. to plug in your own simulator.
//!
//! ## Example
//! ```
//! use segsim::simulation::{JukesCantorSimulator, RateDistribution};
//! use segsim::{alphabet::Alphabet, pipeline, segments};
//!
//! let segment_set = segments::parse_str(
//!     "0 0.3 ((Kea:0.1,Kaka:0.1):0.2,Kakapo:0.3);\n\
//!      0.3 1 ((Kea:0.1,Kakapo:0.1):0.2,Kaka:0.3);",
//! )?;
//! let simulator = JukesCantorSimulator::new(Alphabet::Dna, RateDistribution::Constant, Some(42));
//! let outcome = pipeline::simulate_segments(&segment_set, 10, None, simulator)?;
//!
//! assert_eq!(outcome.allocation.ranges(), &[0..3, 3..10]);
//! assert_eq!(outcome.alignment.get("Kea").unwrap().len(), 10);
//! # Ok::<(), segsim::error::SegSimError>(())
//! ```

pub mod alphabet;
pub mod config;
pub mod error;
pub mod fasta;
pub mod model;
pub mod newick;
pub mod parser;
pub mod pipeline;
pub mod rates;
pub mod segments;
pub mod simulation;

use crate::error::SegSimError;
use crate::pipeline::SimulationOutcome;
use crate::rates::RateTable;
use crate::simulation::SequenceSimulator;
use std::path::Path;

#[doc(inline)]
pub use crate::simulation::JukesCantorSimulator;

// ============================================================================
// Quick Simulation API
// ============================================================================
/// Reads and validates a segment file, then simulates `num_sites` sites
/// along its segments with `simulator`.
///
/// See [`pipeline::simulate_segments`] for details.
pub fn simulate_segment_file<P: AsRef<Path>, S: SequenceSimulator>(
    path: P,
    num_sites: usize,
    simulator: S,
) -> Result<SimulationOutcome, SegSimError> {
    let segment_set = segments::parse_file(path)?;
    pipeline::simulate_segments(&segment_set, num_sites, None, simulator)
}

/// As [simulate_segment_file], with site rates (and site count) taken from
/// the `column` of a rate table file.
pub fn simulate_segment_file_with_rates<P: AsRef<Path>, Q: AsRef<Path>, S: SequenceSimulator>(
    path: P,
    rate_table: Q,
    column: &str,
    simulator: S,
) -> Result<SimulationOutcome, SegSimError> {
    let segment_set = segments::parse_file(path)?;
    let rate_table = RateTable::from_file(rate_table, column)?;
    pipeline::simulate_segments(&segment_set, rate_table.len(), Some(&rate_table), simulator)
}
