use criterion::{Criterion, criterion_group, criterion_main};
use segsim::alphabet::Alphabet;
use segsim::pipeline;
use segsim::segments;
use segsim::simulation::{JukesCantorSimulator, RateDistribution};
use std::fmt::Write;
use std::hint::black_box;

const SEGMENT_COUNTS: &[usize] = &[1, 10, 100];
const NUM_LEAVES: usize = 50;
const NUM_SITES: usize = 10_000;

/// Segment file with `num_segments` equally long segments, each with a
/// caterpillar tree on the same leaves in a rotated order.
fn segment_file(num_segments: usize) -> String {
    let mut content = String::from("# benchmark segments\n");
    for i in 0..num_segments {
        let begin = i as f64 / num_segments as f64;
        let end = if i + 1 == num_segments { 1.0 } else { (i + 1) as f64 / num_segments as f64 };
        let mut newick = String::new();
        for j in 0..NUM_LEAVES {
            let leaf = (i + j) % NUM_LEAVES;
            if j + 1 < NUM_LEAVES {
                write!(newick, "(Taxon_{leaf}:0.05,").unwrap();
            } else {
                write!(newick, "Taxon_{leaf}:0.05").unwrap();
            }
        }
        for _ in 1..NUM_LEAVES {
            newick.push_str("):0.01");
        }
        // the root has no branch
        newick.truncate(newick.len() - ":0.01".len());
        writeln!(content, "{begin} {end} {newick};").unwrap();
    }
    content
}

fn segment_parsing(c: &mut Criterion) {
    for &num_segments in SEGMENT_COUNTS {
        let content = segment_file(num_segments);
        c.bench_function(&format!("parse {num_segments} segments"), |b| {
            b.iter(|| segments::parse_str(black_box(&content)).unwrap());
        });
    }
}

fn segment_simulation(c: &mut Criterion) {
    for &num_segments in SEGMENT_COUNTS {
        let segment_set = segments::parse_str(segment_file(num_segments)).unwrap();
        c.bench_function(&format!("simulate {num_segments} segments"), |b| {
            b.iter(|| {
                let simulator = JukesCantorSimulator::new(Alphabet::Dna, RateDistribution::Constant, Some(1));
                pipeline::simulate_segments(&segment_set, NUM_SITES, None, simulator).unwrap()
            });
        });
    }
}

criterion_group!(parsing, segment_parsing);
criterion_group! {
    name = simulation;
    config = Criterion::default().sample_size(10);
    targets = segment_simulation
}
criterion_main!(parsing, simulation);
