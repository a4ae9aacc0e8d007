//! Per-segment simulation in segment order.

use crate::error::{ConsistencyError, SegSimError};
use crate::rates::RateTable;
use crate::segments::{SegmentSet, SiteAllocation};
use crate::simulation::simulator::{PerSegmentWork, SequenceBlock, SequenceSimulator};

/// Runs a [SequenceSimulator] over the segments of a [SegmentSet].
///
/// Segments are simulated one after the other in segment order, each with
/// the sites of its range in the [SiteAllocation]. With a [RateTable], a
/// segment gets the rates of exactly its range; otherwise it gets the
/// width of its range as site count.
pub struct SegmentSimulationDriver<S: SequenceSimulator> {
    simulator: S,
    num_calls: usize,
}

impl<S: SequenceSimulator> SegmentSimulationDriver<S> {
    pub fn new(simulator: S) -> Self {
        Self { simulator, num_calls: 0 }
    }

    /// Number of simulator invocations so far.
    pub fn num_calls(&self) -> usize {
        self.num_calls
    }

    /// Simulates one [SequenceBlock] per segment, in segment order.
    ///
    /// A single segment takes exactly one call for all sites. A segment
    /// with an empty range is not passed to the simulator; its block holds
    /// an empty sequence per leaf.
    ///
    /// # Errors
    /// * [ConsistencyError::AllocationMismatch] if `allocation` does not
    ///   have one range per segment
    /// * [ConsistencyError::RateTableTooShort] if a range exceeds `rate_table`
    /// * [ConsistencyError::LengthMismatch] if the simulator returns a
    ///   sequence of the wrong length
    /// * [SegSimError::Simulator] if the simulator fails
    pub fn run(
        &mut self,
        segments: &SegmentSet,
        allocation: &SiteAllocation,
        rate_table: Option<&RateTable>,
    ) -> Result<Vec<SequenceBlock>, SegSimError> {
        if allocation.len() != segments.len() {
            return Err(ConsistencyError::AllocationMismatch {
                segments: segments.len(),
                ranges: allocation.len(),
            }
            .into());
        }

        let num_segments = segments.len();
        let mut blocks = Vec::with_capacity(num_segments);
        let mut cursor = 0;

        for (index, (segment, range)) in segments.iter().zip(allocation.ranges()).enumerate() {
            debug_assert_eq!(range.start, cursor);

            let work = match rate_table {
                Some(table) => PerSegmentWork::RateSlice(table.slice(range.clone()).ok_or(
                    ConsistencyError::RateTableTooShort {
                        start: range.start,
                        end: range.end,
                        available: table.len(),
                    },
                )?),
                None => PerSegmentWork::FixedCount(range.len()),
            };

            let block = if work.num_sites() == 0 {
                log::debug!("Segment {}/{}: no sites", index + 1, num_segments);
                SequenceBlock::empty_for(segment.tree())
            } else {
                log::info!(
                    "Simulating segment {}/{}: sites [{}, {})",
                    index + 1,
                    num_segments,
                    range.start,
                    range.end
                );
                self.num_calls += 1;
                self.simulator.simulate(segment.tree(), work)?
            };

            check_block_width(index, &block, range.len())?;
            cursor = range.end;
            blocks.push(block);
        }

        Ok(blocks)
    }
}

fn check_block_width(segment: usize, block: &SequenceBlock, expected: usize) -> Result<(), ConsistencyError> {
    match block.iter().find(|(_, sequence)| sequence.len() != expected) {
        Some((identifier, sequence)) => Err(ConsistencyError::LengthMismatch {
            segment,
            identifier: identifier.to_string(),
            expected,
            actual: sequence.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulatorError;
    use crate::model::PhyloTree;
    use crate::segments;

    /// Fills each site with the first letter of the leaf name.
    struct Stub;

    impl SequenceSimulator for Stub {
        fn simulate(&mut self, tree: &PhyloTree, work: PerSegmentWork<'_>) -> Result<SequenceBlock, SimulatorError> {
            let mut block = SequenceBlock::new();
            for name in tree.leaf_names() {
                block.push(name, vec![name.as_bytes()[0]; work.num_sites()]);
            }
            Ok(block)
        }
    }

    /// Returns one site too many.
    struct Sloppy;

    impl SequenceSimulator for Sloppy {
        fn simulate(&mut self, tree: &PhyloTree, work: PerSegmentWork<'_>) -> Result<SequenceBlock, SimulatorError> {
            let mut block = SequenceBlock::new();
            for name in tree.leaf_names() {
                block.push(name, vec![b'A'; work.num_sites() + 1]);
            }
            Ok(block)
        }
    }

    fn two_segments() -> SegmentSet {
        segments::parse_str("0 0.3 (Ruru,Hihi);\n0.3 1 (Hihi,Ruru);").unwrap()
    }

    #[test]
    fn test_blocks_sized_by_allocation() {
        let segment_set = two_segments();
        let allocation = SiteAllocation::from_boundaries(&segment_set.boundaries(), 10);
        let mut driver = SegmentSimulationDriver::new(Stub);

        let blocks = driver.run(&segment_set, &allocation, None).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].get("Ruru").unwrap().len(), 3);
        assert_eq!(blocks[1].get("Ruru").unwrap().len(), 7);
        assert_eq!(driver.num_calls(), 2);
    }

    #[test]
    fn test_empty_range_skips_simulator() {
        let segment_set = segments::parse_str("0 0.01 (Ruru,Hihi);\n0.01 1 (Hihi,Ruru);").unwrap();
        let allocation = SiteAllocation::from_boundaries(&segment_set.boundaries(), 10);
        let mut driver = SegmentSimulationDriver::new(Stub);

        let blocks = driver.run(&segment_set, &allocation, None).unwrap();
        assert_eq!(blocks[0].len(), 2);
        assert_eq!(blocks[0].get("Hihi"), Some(&[][..]));
        assert_eq!(driver.num_calls(), 1);
    }

    #[test]
    fn test_wrong_block_width_detected() {
        let segment_set = two_segments();
        let allocation = SiteAllocation::from_boundaries(&segment_set.boundaries(), 10);
        let err = SegmentSimulationDriver::new(Sloppy)
            .run(&segment_set, &allocation, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SegSimError::Consistency(ConsistencyError::LengthMismatch { segment: 0, expected: 3, actual: 4, .. })
        ));
    }

    #[test]
    fn test_allocation_mismatch() {
        let allocation = SiteAllocation::from_boundaries(&[0.0, 1.0], 10);
        let err = SegmentSimulationDriver::new(Stub)
            .run(&two_segments(), &allocation, None)
            .unwrap_err();
        assert!(matches!(err, SegSimError::Consistency(ConsistencyError::AllocationMismatch { .. })));
    }

    #[test]
    fn test_rate_table_too_short() {
        let allocation = SiteAllocation::from_boundaries(&[0.0, 0.3, 1.0], 10);
        let table = RateTable::new(vec![1.0; 5]).unwrap();
        let err = SegmentSimulationDriver::new(Stub)
            .run(&two_segments(), &allocation, Some(&table))
            .unwrap_err();
        assert!(matches!(
            err,
            SegSimError::Consistency(ConsistencyError::RateTableTooShort { start: 3, end: 10, available: 5 })
        ));
    }
}
