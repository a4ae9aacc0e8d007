//! Simulation of sequences along segmented trees.
//!
//! * [SequenceSimulator] - seam for simulating one block of sites along one tree
//! * [JukesCantorSimulator] - equal-rates reference implementation
//! * [SegmentSimulationDriver] - simulates the segments in order
//! * [merge_blocks] - concatenates the per-segment blocks per sequence

pub mod driver;
pub mod jukes_cantor;
pub mod merger;
pub mod simulator;

pub use self::driver::SegmentSimulationDriver;
pub use self::jukes_cantor::{JukesCantorSimulator, RateDistribution};
pub use self::merger::{MergedAlignment, merge_blocks};
pub use self::simulator::{PerSegmentWork, SequenceBlock, SequenceSimulator};
