//! End-to-end simulation: segments and rates in, merged alignment out.
//!
//! Stages, each completing before the next starts:
//! 1. segments are read, parsed and validated
//! 2. the rate table (if any) is loaded and fixes the number of sites
//! 3. boundaries are mapped to site ranges
//! 4. each segment is simulated in order
//! 5. blocks are merged
//!
//! Every input error surfaces before the first simulator call, and nothing
//! is returned unless all stages succeed.

use crate::config::{SimulationConfig, TreeInput};
use crate::error::{ConfigError, SegSimError, StructuralError};
use crate::model::PhyloTree;
use crate::newick::{self, NewickStyle};
use crate::rates::RateTable;
use crate::segments::{self, SegmentSet, SiteAllocation};
use crate::simulation::{
    JukesCantorSimulator, MergedAlignment, SegmentSimulationDriver, SequenceSimulator, merge_blocks,
};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Result of a simulation.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// The simulated alignment
    pub alignment: MergedAlignment,
    /// Site range of each segment
    pub allocation: SiteAllocation,
    /// Number of simulator invocations
    pub simulator_calls: usize,
}

/// Result of [run].
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Sequences were simulated
    Simulated(SimulationOutcome),
    /// Only the tree with vertex ids was written, to the given path
    TaggedTreeWritten(PathBuf),
}

/// Simulates an alignment over validated segments.
///
/// # Arguments
/// * `segments` - validated segments
/// * `num_sites` - requested number of sites, ignored if `rate_table` is given
/// * `rate_table` - per-site rates, whose row count is the number of sites
/// * `simulator` - simulator shared by all segments
///
/// # Errors
/// [SegSimError::Consistency] or [SegSimError::Simulator] from the driver
/// and merger.
pub fn simulate_segments<S: SequenceSimulator>(
    segments: &SegmentSet,
    num_sites: usize,
    rate_table: Option<&RateTable>,
    simulator: S,
) -> Result<SimulationOutcome, SegSimError> {
    let total_sites = match rate_table {
        Some(table) => {
            if table.len() != num_sites {
                log::warn!(
                    "Rate table has {} rows, simulating {} instead of {} sites",
                    table.len(),
                    table.len(),
                    num_sites
                );
            }
            table.len()
        }
        None => num_sites,
    };

    let allocation = SiteAllocation::from_boundaries(&segments.boundaries(), total_sites);
    for (index, range) in allocation.ranges().iter().enumerate() {
        log::debug!("Segment {} gets sites [{}, {})", index, range.start, range.end);
    }

    let mut driver = SegmentSimulationDriver::new(simulator);
    let blocks = driver.run(segments, &allocation, rate_table)?;
    let alignment = merge_blocks(blocks)?;

    log::info!(
        "Simulated {} sequences of {} sites over {} segment(s)",
        alignment.num_sequences(),
        alignment.num_sites(),
        segments.len()
    );

    Ok(SimulationOutcome {
        alignment,
        allocation,
        simulator_calls: driver.num_calls(),
    })
}

/// Runs the configuration with the [JukesCantorSimulator].
///
/// With tagged tree output configured, only writes the tagged tree.
///
/// # Errors
/// Any [SegSimError] of reading inputs, validating or simulating.
pub fn run(config: &SimulationConfig) -> Result<RunOutcome, SegSimError> {
    let segments = match config.tree_input() {
        TreeInput::Single(path) => {
            let tree = read_single_tree(path)?;
            if let Some(output) = config.tagged_tree_output() {
                write_tagged_tree(tree, output)?;
                return Ok(RunOutcome::TaggedTreeWritten(output.to_path_buf()));
            }
            SegmentSet::single(tree)?
        }
        TreeInput::Segments(path) => segments::parse_file(path)?,
    };
    check_branch_lengths(&segments)?;

    let rate_table = config
        .rate_table()
        .map(|path| RateTable::from_file(path, config.rate_column()))
        .transpose()?;

    let simulator = JukesCantorSimulator::new(
        config.alphabet(),
        config.rate_distribution().clone(),
        config.seed(),
    );
    let outcome = simulate_segments(&segments, config.num_sites(), rate_table.as_ref(), simulator)?;

    Ok(RunOutcome::Simulated(outcome))
}

/// Reads the first tree of a Newick file.
fn read_single_tree(path: &Path) -> Result<PhyloTree, SegSimError> {
    let mut trees = newick::parse_file(path)?;
    if trees.len() > 1 {
        log::warn!("{} contains {} trees, using the first", path.display(), trees.len());
    }
    if trees.is_empty() {
        return Err(ConfigError::NoTree.into());
    }
    let tree = trees.swap_remove(0);
    log::info!("Read tree with {} leaves from {}", tree.num_leaves(), path.display());
    Ok(tree)
}

/// The equal-rates simulator evolves along every branch, so each tree
/// must have all its branch lengths.
fn check_branch_lengths(segments: &SegmentSet) -> Result<(), StructuralError> {
    match segments.iter().position(|s| !s.tree().vertices_have_branch_lengths()) {
        Some(index) => Err(StructuralError::MissingBranchLength { index }),
        None => Ok(()),
    }
}

fn write_tagged_tree(mut tree: PhyloTree, output: &Path) -> Result<(), SegSimError> {
    tree.tag_vertex_ids();
    newick::write_newick_file(File::create(output)?, std::slice::from_ref(&tree), NewickStyle::Full)?;
    log::info!("Wrote tree with vertex ids to {}", output.display());
    Ok(())
}
