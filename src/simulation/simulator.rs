//! The sequence simulator seam and its output type.

use crate::error::SimulatorError;
use crate::model::PhyloTree;

// =#========================================================================#=
// PER-SEGMENT WORK
// =#========================================================================#=
/// Work handed to a simulator for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerSegmentWork<'a> {
    /// Simulate this many sites, drawing site rates from the model.
    FixedCount(usize),
    /// Simulate one site per given rate, in order.
    RateSlice(&'a [f64]),
}

impl PerSegmentWork<'_> {
    /// Number of sites to simulate.
    pub fn num_sites(&self) -> usize {
        match self {
            PerSegmentWork::FixedCount(n) => *n,
            PerSegmentWork::RateSlice(rates) => rates.len(),
        }
    }
}

// =#========================================================================#=
// SEQUENCE SIMULATOR
// =#========================================================================#=
/// Simulates sequences along a tree.
///
/// Implementations share their substitution model over all segments and
/// keep their random state between calls, so a seeded simulator yields the
/// same alignment for the same sequence of calls.
pub trait SequenceSimulator {
    /// Simulates `work.num_sites()` sites along `tree`.
    ///
    /// The returned block holds one sequence per leaf of `tree`, named after
    /// the leaf, each of length `work.num_sites()`.
    fn simulate(
        &mut self,
        tree: &PhyloTree,
        work: PerSegmentWork<'_>,
    ) -> Result<SequenceBlock, SimulatorError>;
}

impl<S: SequenceSimulator + ?Sized> SequenceSimulator for &mut S {
    fn simulate(
        &mut self,
        tree: &PhyloTree,
        work: PerSegmentWork<'_>,
    ) -> Result<SequenceBlock, SimulatorError> {
        (**self).simulate(tree, work)
    }
}

// =#========================================================================#=
// SEQUENCE BLOCK
// =#========================================================================#=
/// Named sequences simulated for one segment.
///
/// Keeps insertion order; identifiers are expected to be unique, which
/// is checked when blocks are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceBlock {
    names: Vec<String>,
    sequences: Vec<Vec<u8>>,
}

impl SequenceBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_sequences: usize) -> Self {
        Self {
            names: Vec::with_capacity(num_sequences),
            sequences: Vec::with_capacity(num_sequences),
        }
    }

    /// Block with an empty sequence for each leaf of `tree`, in pre-order.
    pub fn empty_for(tree: &PhyloTree) -> Self {
        let mut block = Self::with_capacity(tree.num_leaves());
        for name in tree.leaf_names() {
            block.push(name, Vec::new());
        }
        block
    }

    /// Appends a named sequence.
    pub fn push(&mut self, name: impl Into<String>, sequence: Vec<u8>) {
        self.names.push(name.into());
        self.sequences.push(sequence);
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sequence named `name`, if present.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.sequences[i].as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.sequences.iter().map(Vec::as_slice))
    }

    /// Consumes the block, returning `(name, sequence)` pairs.
    pub fn into_parts(self) -> impl Iterator<Item = (String, Vec<u8>)> {
        self.names.into_iter().zip(self.sequences)
    }
}
