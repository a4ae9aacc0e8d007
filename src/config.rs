//! Configuration of a simulation run.

use crate::alphabet::Alphabet;
use crate::error::ConfigError;
use crate::rates::DEFAULT_RATE_COLUMN;
use crate::simulation::RateDistribution;
use std::path::{Path, PathBuf};

/// Default number of sites when no rate table is given.
pub const DEFAULT_NUM_SITES: usize = 100;

/// Source of the tree(s).
#[derive(Debug, Clone, PartialEq)]
pub enum TreeInput {
    /// Newick file with one tree governing all sites
    Single(PathBuf),
    /// Segment file with records `begin end newick;`
    Segments(PathBuf),
}

impl TreeInput {
    pub fn path(&self) -> &Path {
        match self {
            TreeInput::Single(path) | TreeInput::Segments(path) => path,
        }
    }
}

// =#========================================================================#=
// SIMULATION CONFIG
// =#========================================================================#=
/// Validated configuration of a simulation run; create it with
/// [SimulationConfigBuilder].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    tree_input: TreeInput,
    num_sites: usize,
    rate_table: Option<PathBuf>,
    rate_column: String,
    alphabet: Alphabet,
    rate_distribution: RateDistribution,
    seed: Option<u64>,
    tagged_tree_output: Option<PathBuf>,
}

impl SimulationConfig {
    pub fn tree_input(&self) -> &TreeInput {
        &self.tree_input
    }

    /// Requested number of sites; superseded by the rows of a rate table.
    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    pub fn rate_table(&self) -> Option<&Path> {
        self.rate_table.as_deref()
    }

    pub fn rate_column(&self) -> &str {
        &self.rate_column
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Site-rate distribution; always constant when a rate table is given.
    pub fn rate_distribution(&self) -> &RateDistribution {
        &self.rate_distribution
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn tagged_tree_output(&self) -> Option<&Path> {
        self.tagged_tree_output.as_deref()
    }
}

// =#========================================================================#=
// BUILDER
// =#========================================================================#=
/// Builder for [SimulationConfig].
///
/// # Example
/// ```
/// use segsim::alphabet::Alphabet;
/// use segsim::config::SimulationConfigBuilder;
///
/// let config = SimulationConfigBuilder::for_segments("recombination.txt")
///     .with_num_sites(500)
///     .with_alphabet(Alphabet::Dna)
///     .with_gamma(0.5)
///     .with_seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(config.num_sites(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationConfigBuilder {
    tree_input: TreeInput,
    num_sites: usize,
    rate_table: Option<PathBuf>,
    rate_column: String,
    alphabet: Alphabet,
    gamma_alpha: Option<f64>,
    seed: Option<u64>,
    tagged_tree_output: Option<PathBuf>,
}

impl SimulationConfigBuilder {
    fn new(tree_input: TreeInput) -> Self {
        Self {
            tree_input,
            num_sites: DEFAULT_NUM_SITES,
            rate_table: None,
            rate_column: DEFAULT_RATE_COLUMN.to_string(),
            alphabet: Alphabet::default(),
            gamma_alpha: None,
            seed: None,
            tagged_tree_output: None,
        }
    }

    /// Starts a configuration reading one tree from a Newick file.
    pub fn for_single_tree<P: AsRef<Path>>(path: P) -> Self {
        Self::new(TreeInput::Single(path.as_ref().to_path_buf()))
    }

    /// Starts a configuration reading a segment file.
    pub fn for_segments<P: AsRef<Path>>(path: P) -> Self {
        Self::new(TreeInput::Segments(path.as_ref().to_path_buf()))
    }

    pub fn with_num_sites(mut self, num_sites: usize) -> Self {
        self.num_sites = num_sites;
        self
    }

    /// Reads per-site rates from a tab-separated file; its row count then
    /// determines the number of sites.
    pub fn with_rate_table<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.rate_table = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_rate_column(mut self, column: impl Into<String>) -> Self {
        self.rate_column = column.into();
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Draws site rates from a gamma distribution with shape `alpha` and mean 1.
    pub fn with_gamma(mut self, alpha: f64) -> Self {
        self.gamma_alpha = Some(alpha);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Writes the tree with vertex ids to `path` instead of simulating.
    pub fn with_tagged_tree_output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.tagged_tree_output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    /// * [ConfigError::NoSites] if no rate table is given and `num_sites` is 0
    /// * [ConfigError::InvalidGammaShape] for a non-positive gamma shape
    /// * [ConfigError::TaggedTreeRequiresSingleTree] for tagged tree output
    ///   with a segment file
    /// * [ConfigError::EmptyRateColumn] for an empty rate column name
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        if self.num_sites == 0 && self.rate_table.is_none() {
            return Err(ConfigError::NoSites);
        }
        if self.rate_column.trim().is_empty() {
            return Err(ConfigError::EmptyRateColumn);
        }
        if self.tagged_tree_output.is_some() && !matches!(self.tree_input, TreeInput::Single(_)) {
            return Err(ConfigError::TaggedTreeRequiresSingleTree);
        }

        let mut rate_distribution = match self.gamma_alpha {
            Some(alpha) => RateDistribution::gamma(alpha)?,
            None => RateDistribution::Constant,
        };
        if self.rate_table.is_some() && rate_distribution != RateDistribution::Constant {
            log::warn!("Rate table given, ignoring gamma distribution of site rates");
            rate_distribution = RateDistribution::Constant;
        }

        Ok(SimulationConfig {
            tree_input: self.tree_input,
            num_sites: self.num_sites,
            rate_table: self.rate_table,
            rate_column: self.rate_column,
            alphabet: self.alphabet,
            rate_distribution,
            seed: self.seed,
            tagged_tree_output: self.tagged_tree_output,
        })
    }
}
