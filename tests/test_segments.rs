use segsim::error::{SegSimError, StructuralError};
use segsim::parser::ParsingErrorType;
use segsim::segments::{self, SiteAllocation};
use std::path::Path;

// --- TESTS READING SEGMENT FILES ---
#[test]
fn test_parsing_segment_file() {
    let path = Path::new("tests").join("fixtures").join("kiwi_segments.txt");
    let segment_set = segments::parse_file(path).unwrap();

    assert_eq!(segment_set.len(), 3);
    assert_eq!(segment_set.boundaries(), vec![0.0, 0.25, 0.6, 1.0]);
    for segment in &segment_set {
        assert_eq!(segment.tree().num_leaves(), 5);
        assert!(segment.tree().is_valid());
    }

    // Multi-line first tree keeps its leaf order
    assert_eq!(
        segment_set.leaf_names(),
        vec![
            "Apteryx_australis",
            "Apteryx_rowi",
            "Apteryx_haastii",
            "Apteryx_owenii",
            "Apteryx_mantelli"
        ]
    );
}

#[test]
fn test_leaf_order_may_differ_between_trees() {
    let segment_set = segments::parse_str("0 0.5 ((A,B),C);\n0.5 1 (C,(B,A));").unwrap();
    assert_eq!(segment_set.len(), 2);
}

#[test]
fn test_only_comments() {
    let err = segments::parse_str("# nothing here\n\n").unwrap_err();
    assert!(matches!(err, SegSimError::Structural(StructuralError::NoSegments)));
}

// --- TESTS DEALING WITH CORRUPT SEGMENT FILES ---
#[test]
fn test_unterminated_tree() {
    let err = segments::parse_str("0 0.5 (A,B);\n0.5 1 (A,B)\n").unwrap_err();
    match err {
        SegSimError::Parse(e) => {
            assert_eq!(e.kind(), &ParsingErrorType::UnterminatedTree);
            assert_eq!(e.position(), 19);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_missing_position() {
    let err = segments::parse_str("0 (A,B);").unwrap_err();
    assert!(matches!(
        err,
        SegSimError::Parse(ref e) if matches!(e.kind(), ParsingErrorType::InvalidNumber(_))
    ));
}

#[test]
fn test_invalid_tree_text() {
    let err = segments::parse_str("0 1 (A,,B);").unwrap_err();
    assert!(matches!(
        err,
        SegSimError::Parse(ref e) if matches!(e.kind(), ParsingErrorType::InvalidNewickString(_))
    ));
}

#[test]
fn test_first_offending_leaf_set_reported() {
    let input = "0 0.2 ((Kea,Kaka),Kakapo);\n\
                 0.2 0.4 ((Kea,Kaka),Kakapo);\n\
                 0.4 0.7 ((Kea,Kaka),Takahe);\n\
                 0.7 1 ((Kea,Moa),Kakapo);";
    let err = segments::parse_str(input).unwrap_err();
    match err {
        SegSimError::Structural(e) => {
            assert_eq!(e.segment_index(), Some(2));
            assert!(matches!(e, StructuralError::LeafSetMismatch { .. }));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_gap_reported_with_index() {
    let err = segments::parse_str("0 0.3 (A,B);\n0.35 1 (A,B);").unwrap_err();
    assert!(matches!(
        err,
        SegSimError::Structural(StructuralError::BoundaryGap { index: 1, .. })
    ));
    assert!(err.to_string().contains("segment 1"));
}

// --- TESTS SITE ALLOCATION ---
#[test]
fn test_allocation_of_fixture() {
    let path = Path::new("tests").join("fixtures").join("kiwi_segments.txt");
    let segment_set = segments::parse_file(path).unwrap();
    let allocation = SiteAllocation::from_boundaries(&segment_set.boundaries(), 1000);
    assert_eq!(allocation.ranges(), &[0..250, 250..600, 600..1000]);
}

#[test]
fn test_allocation_partitions_sites() {
    let boundaries = [0.0, 0.333, 0.667, 1.0];
    let allocation = SiteAllocation::from_boundaries(&boundaries, 10);

    // Rounding each segment width independently would give 3 + 3 + 3
    let independent: usize = boundaries
        .windows(2)
        .map(|w| ((w[1] - w[0]) * 10.0).round() as usize)
        .sum();
    assert_ne!(independent, 10);

    assert_eq!(allocation.widths().iter().sum::<usize>(), 10);
    assert_eq!(allocation.ranges().first().map(|r| r.start), Some(0));
    assert_eq!(allocation.ranges().last().map(|r| r.end), Some(10));
    for pair in allocation.ranges().windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}
