//! Segsim CLI - simulate sequence alignments along segmented trees.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use segsim::alphabet::Alphabet;
use segsim::config::{DEFAULT_NUM_SITES, SimulationConfigBuilder};
use segsim::fasta;
use segsim::pipeline::{self, RunOutcome};
use segsim::rates::DEFAULT_RATE_COLUMN;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Segsim - sequence simulation along segmented trees
#[derive(Parser, Debug)]
#[command(name = "segsim")]
#[command(author, version, about = "Simulates sequence alignments along segmented trees", long_about = None)]
struct Cli {
    /// Newick file with a single tree for all sites
    #[arg(short, long, required_unless_present = "segments", conflicts_with = "segments")]
    tree: Option<PathBuf>,

    /// Segment file with records `begin end newick;`
    #[arg(short, long)]
    segments: Option<PathBuf>,

    /// Number of sites (superseded by the rows of a rate table)
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_SITES)]
    sites: usize,

    /// Tab-separated table of per-site rates
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Column of the rate table holding the rates
    #[arg(long, default_value = DEFAULT_RATE_COLUMN)]
    rate_column: String,

    /// Alphabet: DNA, RNA or Protein
    #[arg(short, long, default_value = "DNA")]
    alphabet: Alphabet,

    /// Shape of gamma-distributed site rates (constant rates if absent)
    #[arg(long)]
    gamma: Option<f64>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// FASTA output path (stdout if absent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the tree with vertex ids to this path and exit
    #[arg(long, requires = "tree")]
    tagged_tree: Option<PathBuf>,

    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Less log output (repeat for less)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut builder = match (&cli.tree, &cli.segments) {
        (Some(tree), _) => SimulationConfigBuilder::for_single_tree(tree),
        (None, Some(segments)) => SimulationConfigBuilder::for_segments(segments),
        (None, None) => anyhow::bail!("either --tree or --segments is required"),
    };
    builder = builder
        .with_num_sites(cli.sites)
        .with_rate_column(cli.rate_column)
        .with_alphabet(cli.alphabet);
    if let Some(rates) = &cli.rates {
        builder = builder.with_rate_table(rates);
    }
    if let Some(alpha) = cli.gamma {
        builder = builder.with_gamma(alpha);
    }
    if let Some(seed) = cli.seed {
        builder = builder.with_seed(seed);
    }
    if let Some(tagged_tree) = &cli.tagged_tree {
        builder = builder.with_tagged_tree_output(tagged_tree);
    }
    let config = builder.build().context("Invalid configuration")?;

    let outcome = match pipeline::run(&config).context("Simulation failed")? {
        RunOutcome::Simulated(outcome) => outcome,
        RunOutcome::TaggedTreeWritten(path) => {
            eprintln!("Tree with vertex ids written to {}", path.display());
            return Ok(());
        }
    };

    match &cli.output {
        Some(path) => {
            fasta::write_alignment_file(path, &outcome.alignment)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote alignment to {}", path.display());
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            fasta::write_alignment(&mut writer, &outcome.alignment)
                .and_then(|_| writer.flush())
                .context("Failed to write alignment to stdout")?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = match (quiet, verbose) {
        (0, 0) => LevelFilter::Info,
        (0, 1) => LevelFilter::Debug,
        (0, _) => LevelFilter::Trace,
        (1, _) => LevelFilter::Warn,
        _ => LevelFilter::Error,
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    if verbose > 0 || quiet > 0 {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}
