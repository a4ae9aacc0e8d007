use segsim::alphabet::Alphabet;
use segsim::config::SimulationConfigBuilder;
use segsim::error::{ConsistencyError, SegSimError, SimulatorError};
use segsim::model::PhyloTree;
use segsim::pipeline::{self, RunOutcome};
use segsim::segments::{self, SegmentSet};
use segsim::simulation::{
    JukesCantorSimulator, PerSegmentWork, RateDistribution, SequenceBlock, SequenceSimulator,
};
use segsim::{fasta, newick, simulate_segment_file};
use std::path::Path;

/// Counts invocations; fills sequences with a per-call marker (`a`, `b`, ...).
#[derive(Default)]
struct CountingStub {
    calls: usize,
}

impl SequenceSimulator for CountingStub {
    fn simulate(&mut self, tree: &PhyloTree, work: PerSegmentWork<'_>) -> Result<SequenceBlock, SimulatorError> {
        let marker = b'a' + self.calls as u8;
        self.calls += 1;
        let mut block = SequenceBlock::new();
        for name in tree.leaf_names() {
            block.push(name, vec![marker; work.num_sites()]);
        }
        Ok(block)
    }
}

/// Drops the last leaf of every tree after the first call.
#[derive(Default)]
struct DroppingStub {
    calls: usize,
}

impl SequenceSimulator for DroppingStub {
    fn simulate(&mut self, tree: &PhyloTree, work: PerSegmentWork<'_>) -> Result<SequenceBlock, SimulatorError> {
        let mut names = tree.leaf_names();
        if self.calls > 0 {
            names.pop();
        }
        self.calls += 1;
        let mut block = SequenceBlock::new();
        for name in names {
            block.push(name, vec![b'C'; work.num_sites()]);
        }
        Ok(block)
    }
}

// --- TESTS SCENARIOS ---
#[test]
fn test_single_segment_is_one_block() {
    let segment_set = SegmentSet::single(newick::parse_str("((Kea:1,Kaka:1):1,Kakapo:2);").unwrap()).unwrap();
    let mut stub = CountingStub::default();

    let outcome = pipeline::simulate_segments(&segment_set, 100, None, &mut stub).unwrap();

    assert_eq!(stub.calls, 1);
    assert_eq!(outcome.simulator_calls, 1);
    assert_eq!(outcome.allocation.ranges(), &[0..100]);
    assert_eq!(outcome.alignment.num_sequences(), 3);
    for (_, sequence) in outcome.alignment.iter() {
        assert_eq!(sequence, vec![b'a'; 100].as_slice());
    }
}

#[test]
fn test_two_segments_concatenated_in_order() {
    let segment_set =
        segments::parse_str("0 0.3 ((Kea,Kaka),Kakapo);\n0.3 1.0 (Kea,(Kaka,Kakapo));").unwrap();
    let mut stub = CountingStub::default();

    let outcome = pipeline::simulate_segments(&segment_set, 10, None, &mut stub).unwrap();

    assert_eq!(outcome.allocation.ranges(), &[0..3, 3..10]);
    for (_, sequence) in outcome.alignment.iter() {
        assert_eq!(sequence, b"aaabbbbbbb");
    }
}

#[test]
fn test_rounding_drift_scenario() {
    let segment_set =
        segments::parse_str("0 0.333 (A,B);\n0.333 0.667 (B,A);\n0.667 1.0 (A,B);").unwrap();
    let mut stub = CountingStub::default();

    let outcome = pipeline::simulate_segments(&segment_set, 10, None, &mut stub).unwrap();

    assert_eq!(outcome.allocation.widths().iter().sum::<usize>(), 10);
    assert_eq!(outcome.alignment.get("A"), Some(&b"aaabbbbccc"[..]));
}

#[test]
fn test_no_simulation_on_invalid_segments() {
    let mut stub = CountingStub::default();
    let inputs = [
        "0 0.4 (A,B);\n0.5 1 (A,B);",
        "0 0.4 (A,B);\n0.4 1 (A,C);",
        "0 0.4 (A,B);\n0.4 0.9 (A,B);",
        "0 0.4 (A,B);\n0.4 1 (A,B)",
    ];

    for input in inputs {
        let result = segments::parse_str(input)
            .and_then(|segment_set| pipeline::simulate_segments(&segment_set, 10, None, &mut stub));
        assert!(result.is_err(), "accepted {input:?}");
    }
    assert_eq!(stub.calls, 0);
}

#[test]
fn test_dropped_sequence_is_consistency_error() {
    let segment_set = segments::parse_str("0 0.5 (A,B,C);\n0.5 1 (C,B,A);").unwrap();
    let err = pipeline::simulate_segments(&segment_set, 10, None, DroppingStub::default()).unwrap_err();
    assert!(matches!(
        err,
        SegSimError::Consistency(ConsistencyError::IdentifierMismatch { segment: 1, .. })
    ));
}

// --- TESTS FULL RUNS ---
#[test]
fn test_simulate_segment_file_with_reference_simulator() {
    let path = Path::new("tests").join("fixtures").join("kiwi_segments.txt");
    let simulator = JukesCantorSimulator::new(Alphabet::Dna, RateDistribution::gamma(1.0).unwrap(), Some(5));

    let outcome = simulate_segment_file(path, 250, simulator).unwrap();

    assert_eq!(outcome.simulator_calls, 3);
    assert_eq!(outcome.alignment.num_sequences(), 5);
    assert_eq!(outcome.alignment.num_sites(), 250);
    assert!(outcome.alignment.iter().all(|(_, s)| s.iter().all(|c| b"ACGT".contains(c))));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let path = Path::new("tests").join("fixtures").join("kiwi_segments.txt");
    let config = SimulationConfigBuilder::for_segments(&path)
        .with_num_sites(120)
        .with_alphabet(Alphabet::Protein)
        .with_seed(2024)
        .build()
        .unwrap();

    let alignments: Vec<_> = (0..2)
        .map(|_| match pipeline::run(&config).unwrap() {
            RunOutcome::Simulated(outcome) => outcome.alignment,
            RunOutcome::TaggedTreeWritten(_) => panic!("expected simulation"),
        })
        .collect();
    assert_eq!(alignments[0], alignments[1]);
}

#[test]
fn test_run_with_rate_table_writes_fasta() {
    let fixtures = Path::new("tests").join("fixtures");
    let config = SimulationConfigBuilder::for_single_tree(fixtures.join("kiwi_tree.nwk"))
        .with_num_sites(1000)
        .with_rate_table(fixtures.join("rates_n10.tsv"))
        .with_seed(1)
        .build()
        .unwrap();

    let RunOutcome::Simulated(outcome) = pipeline::run(&config).unwrap() else {
        panic!("expected simulation");
    };
    assert_eq!(outcome.alignment.num_sites(), 10);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("kiwi.fasta");
    fasta::write_alignment_file(&output, &outcome.alignment).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert!(text.starts_with(">Apteryx_australis\n"));
}
