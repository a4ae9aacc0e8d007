//! Structural checks on an ordered list of segments.

use crate::error::StructuralError;
use crate::segments::Segment;
use std::collections::BTreeSet;

/// Checks that the segments form a valid segmentation of `[0, 1]`.
///
/// Segments are checked in order; for each segment, positions are checked
/// before leaves:
/// 1. `begin` and `end` lie in `[0, 1]`
/// 2. `begin <= end`
/// 3. `begin` equals the previous `end` (0 for the first segment),
///    compared exactly as parsed
/// 4. leaf names of the tree are unique
/// 5. the leaf-name set equals that of the first tree
///
/// Finally, the last segment has to end at 1.
///
/// # Errors
/// The [StructuralError] of the first violation, naming the segment index.
pub fn validate(segments: &[Segment]) -> Result<(), StructuralError> {
    let Some(first) = segments.first() else {
        return Err(StructuralError::NoSegments);
    };
    let reference_leaves = first.tree().leaf_name_set();

    let mut previous_end = 0.0;
    for (index, segment) in segments.iter().enumerate() {
        check_positions(index, segment, previous_end)?;

        if let Some(name) = segment.tree().duplicate_leaf_name() {
            return Err(StructuralError::DuplicateLeafName { index, name: name.to_string() });
        }

        if index > 0 {
            check_leaves(index, &reference_leaves, &segment.tree().leaf_name_set())?;
        }

        previous_end = segment.end();
    }

    if previous_end != 1.0 {
        return Err(StructuralError::IncompleteCoverage {
            index: segments.len() - 1,
            end: previous_end,
        });
    }

    Ok(())
}

fn check_positions(index: usize, segment: &Segment, previous_end: f64) -> Result<(), StructuralError> {
    for value in [segment.begin(), segment.end()] {
        if !(0.0..=1.0).contains(&value) {
            return Err(StructuralError::BoundaryOutOfRange { index, value });
        }
    }

    if segment.begin() > segment.end() {
        return Err(StructuralError::ReversedSegment {
            index,
            begin: segment.begin(),
            end: segment.end(),
        });
    }

    if segment.begin() != previous_end {
        return Err(StructuralError::BoundaryGap {
            index,
            begin: segment.begin(),
            previous_end,
        });
    }

    Ok(())
}

fn check_leaves(
    index: usize,
    reference: &BTreeSet<&str>,
    leaves: &BTreeSet<&str>,
) -> Result<(), StructuralError> {
    if reference == leaves {
        return Ok(());
    }

    Err(StructuralError::LeafSetMismatch {
        index,
        missing: reference.difference(leaves).map(|s| s.to_string()).collect(),
        unexpected: leaves.difference(reference).map(|s| s.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::parse_str;

    fn segment(begin: f64, end: f64, newick: &str) -> Segment {
        Segment::new(begin, end, parse_str(newick).unwrap())
    }

    #[test]
    fn test_valid_segments() {
        let segments = vec![
            segment(0.0, 0.4, "((A,B),C);"),
            segment(0.4, 0.4, "(A,(B,C));"),
            segment(0.4, 1.0, "(C,B,A);"),
        ];
        assert_eq!(validate(&segments), Ok(()));
    }

    #[test]
    fn test_empty() {
        assert_eq!(validate(&[]), Err(StructuralError::NoSegments));
    }

    #[test]
    fn test_first_segment_must_start_at_zero() {
        let segments = vec![segment(0.1, 1.0, "(A,B);")];
        assert_eq!(
            validate(&segments),
            Err(StructuralError::BoundaryGap { index: 0, begin: 0.1, previous_end: 0.0 })
        );
    }

    #[test]
    fn test_gap_between_segments() {
        let segments = vec![
            segment(0.0, 0.3, "(A,B);"),
            segment(0.3, 0.6, "(A,B);"),
            segment(0.7, 1.0, "(A,B);"),
        ];
        let err = validate(&segments).unwrap_err();
        assert!(matches!(err, StructuralError::BoundaryGap { index: 2, .. }));
    }

    #[test]
    fn test_last_segment_must_end_at_one() {
        let segments = vec![segment(0.0, 0.5, "(A,B);"), segment(0.5, 0.9, "(A,B);")];
        assert_eq!(
            validate(&segments),
            Err(StructuralError::IncompleteCoverage { index: 1, end: 0.9 })
        );
    }

    #[test]
    fn test_out_of_range_and_reversed() {
        let err = validate(&[segment(0.0, 1.5, "(A,B);")]).unwrap_err();
        assert!(matches!(err, StructuralError::BoundaryOutOfRange { index: 0, .. }));

        let segments = vec![segment(0.0, 0.6, "(A,B);"), segment(0.6, 0.2, "(A,B);")];
        let err = validate(&segments).unwrap_err();
        assert!(matches!(err, StructuralError::ReversedSegment { index: 1, .. }));
    }

    #[test]
    fn test_leaf_set_mismatch_names_first_offender() {
        let segments = vec![
            segment(0.0, 0.2, "((A,B),C);"),
            segment(0.2, 0.5, "((A,B),D);"),
            segment(0.5, 1.0, "((A,B),E);"),
        ];
        assert_eq!(
            validate(&segments),
            Err(StructuralError::LeafSetMismatch {
                index: 1,
                missing: vec!["C".to_string()],
                unexpected: vec!["D".to_string()],
            })
        );
    }

    #[test]
    fn test_duplicate_leaf_names() {
        let err = validate(&[segment(0.0, 1.0, "((A,B),A);")]).unwrap_err();
        assert_eq!(err, StructuralError::DuplicateLeafName { index: 0, name: "A".to_string() });
        assert_eq!(err.segment_index(), Some(0));
    }
}
