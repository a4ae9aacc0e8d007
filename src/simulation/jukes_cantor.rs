//! Reference simulator under the equal-rates model.
//!
//! Every state changes into every other state at the same rate (JC69 for
//! nucleotides, its Mk generalisation for other alphabets), root states are
//! drawn uniformly. Along a branch of length `t` at site rate `r`, a state
//! changes with probability `(k-1)/k * (1 - exp(-k/(k-1) * r * t))` for `k`
//! states, and then becomes one of the other states uniformly at random.

use crate::alphabet::Alphabet;
use crate::error::{ConfigError, SimulatorError};
use crate::model::{PhyloTree, VertexIndex};
use crate::simulation::simulator::{PerSegmentWork, SequenceBlock, SequenceSimulator};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma};
use rand_xoshiro::Xoshiro256PlusPlus;

// =#========================================================================#=
// RATE DISTRIBUTION
// =#========================================================================#=
/// Distribution of site rates used when no rates are given explicitly.
#[derive(Debug, Clone, Default)]
pub enum RateDistribution {
    /// Every site evolves at rate 1.
    #[default]
    Constant,
    /// Rates drawn from a gamma distribution with mean 1.
    Gamma { alpha: f64, gamma: Gamma<f64> },
}

impl RateDistribution {
    /// Gamma distribution with shape `alpha` and scale `1 / alpha`.
    ///
    /// # Errors
    /// [ConfigError::InvalidGammaShape] unless `alpha` is positive and finite.
    pub fn gamma(alpha: f64) -> Result<Self, ConfigError> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ConfigError::InvalidGammaShape(alpha));
        }
        let gamma = Gamma::new(alpha, 1.0 / alpha).map_err(|_| ConfigError::InvalidGammaShape(alpha))?;
        Ok(RateDistribution::Gamma { alpha, gamma })
    }

    /// Draws the rate of one site.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            RateDistribution::Constant => 1.0,
            RateDistribution::Gamma { gamma, .. } => gamma.sample(rng),
        }
    }
}

impl PartialEq for RateDistribution {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RateDistribution::Constant, RateDistribution::Constant) => true,
            (RateDistribution::Gamma { alpha: a, .. }, RateDistribution::Gamma { alpha: b, .. }) => a == b,
            _ => false,
        }
    }
}

// =#========================================================================#=
// JUKES-CANTOR SIMULATOR
// =#========================================================================#=
/// [SequenceSimulator] under the equal-rates model for any [Alphabet].
///
/// # Example
/// ```
/// use segsim::alphabet::Alphabet;
/// use segsim::newick::parse_str;
/// use segsim::simulation::{JukesCantorSimulator, PerSegmentWork, RateDistribution, SequenceSimulator};
///
/// let tree = parse_str("((Kiwi:0.1,Weka:0.2):0.05,Kakapo:0.3);").unwrap();
/// let mut simulator = JukesCantorSimulator::new(Alphabet::Dna, RateDistribution::Constant, Some(7));
/// let block = simulator.simulate(&tree, PerSegmentWork::FixedCount(50)).unwrap();
/// assert_eq!(block.get("Weka").unwrap().len(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct JukesCantorSimulator {
    alphabet: Alphabet,
    rate_distribution: RateDistribution,
    rng: Xoshiro256PlusPlus,
}

impl JukesCantorSimulator {
    /// Creates a simulator; without `seed`, a random seed is drawn and logged.
    pub fn new(alphabet: Alphabet, rate_distribution: RateDistribution, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let seed = rand::rng().random();
            log::info!("Random seed: {}", seed);
            seed
        });

        Self {
            alphabet,
            rate_distribution,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn rate_distribution(&self) -> &RateDistribution {
        &self.rate_distribution
    }

    /// Resolves the site rates of `work`.
    fn site_rates(&mut self, work: PerSegmentWork<'_>) -> Result<Vec<f64>, SimulatorError> {
        match work {
            PerSegmentWork::FixedCount(n) => {
                Ok((0..n).map(|_| self.rate_distribution.sample(&mut self.rng)).collect())
            }
            PerSegmentWork::RateSlice(rates) => {
                if let Some((site, &rate)) =
                    rates.iter().enumerate().find(|(_, r)| !(r.is_finite() && **r >= 0.0))
                {
                    return Err(SimulatorError::InvalidRate { site, rate });
                }
                Ok(rates.to_vec())
            }
        }
    }
}

impl SequenceSimulator for JukesCantorSimulator {
    fn simulate(
        &mut self,
        tree: &PhyloTree,
        work: PerSegmentWork<'_>,
    ) -> Result<SequenceBlock, SimulatorError> {
        let num_states = self.alphabet.size();
        if num_states < 2 {
            return Err(SimulatorError::AlphabetTooSmall { size: num_states });
        }

        // Parents come before children; the root has no branch to evolve along
        let mut order: Vec<(VertexIndex, Option<(VertexIndex, f64)>)> =
            Vec::with_capacity(tree.num_vertices());
        for vertex in tree.pre_order_iter() {
            let branch = match vertex.parent() {
                None => None,
                Some(parent) => {
                    let length = vertex
                        .branch_length()
                        .ok_or(SimulatorError::MissingBranchLength { vertex: vertex.index() })?;
                    Some((parent, *length))
                }
            };
            order.push((vertex.index(), branch));
        }
        let leaves: Vec<VertexIndex> = tree
            .pre_order_iter()
            .filter(|v| v.is_leaf())
            .map(|v| v.index())
            .collect();

        let rates = self.site_rates(work)?;
        let mut sequences = vec![Vec::with_capacity(rates.len()); leaves.len()];
        let mut states = vec![0usize; tree.num_vertices()];

        for &rate in &rates {
            for &(index, branch) in &order {
                states[index] = match branch {
                    None => self.rng.random_range(0..num_states),
                    Some((parent, length)) => {
                        evolve(&mut self.rng, states[parent], num_states, rate * length)
                    }
                };
            }
            for (sequence, &leaf) in sequences.iter_mut().zip(&leaves) {
                sequence.push(self.alphabet.symbol(states[leaf]));
            }
        }

        let mut block = SequenceBlock::with_capacity(leaves.len());
        for (sequence, &leaf) in sequences.into_iter().zip(&leaves) {
            // leaves always have names
            block.push(tree[leaf].name().unwrap_or_default(), sequence);
        }

        Ok(block)
    }
}

/// Evolves `state` along a branch of expected `distance` substitutions.
fn evolve<R: Rng + ?Sized>(rng: &mut R, state: usize, num_states: usize, distance: f64) -> usize {
    let k = num_states as f64;
    let p_change = (k - 1.0) / k * (1.0 - (-k / (k - 1.0) * distance).exp());
    if rng.random::<f64>() >= p_change {
        return state;
    }

    let other = rng.random_range(0..num_states - 1);
    if other >= state { other + 1 } else { other }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::parse_str;

    fn tree() -> PhyloTree {
        parse_str("((Kea:0.1,Kaka:0.2):0.1,(Kakapo:0.3,Takahe:0.05,Pukeko:0.05):0.2);").unwrap()
    }

    #[test]
    fn test_block_shape() {
        let mut simulator = JukesCantorSimulator::new(Alphabet::Dna, RateDistribution::Constant, Some(42));
        let block = simulator.simulate(&tree(), PerSegmentWork::FixedCount(100)).unwrap();

        assert_eq!(block.names(), &["Kea", "Kaka", "Kakapo", "Takahe", "Pukeko"]);
        for (_, sequence) in block.iter() {
            assert_eq!(sequence.len(), 100);
            assert!(sequence.iter().all(|c| b"ACGT".contains(c)));
        }
    }

    #[test]
    fn test_same_seed_same_sequences() {
        let rates = RateDistribution::gamma(0.5).unwrap();
        let mut first = JukesCantorSimulator::new(Alphabet::Protein, rates.clone(), Some(123));
        let mut second = JukesCantorSimulator::new(Alphabet::Protein, rates, Some(123));

        let work = PerSegmentWork::FixedCount(64);
        assert_eq!(
            first.simulate(&tree(), work).unwrap(),
            second.simulate(&tree(), work).unwrap()
        );
    }

    #[test]
    fn test_zero_rates_copy_root_state() {
        let mut simulator = JukesCantorSimulator::new(Alphabet::Rna, RateDistribution::Constant, Some(1));
        let block = simulator
            .simulate(&tree(), PerSegmentWork::RateSlice(&[0.0; 30]))
            .unwrap();

        let kea = block.get("Kea").unwrap().to_vec();
        assert!(block.iter().all(|(_, sequence)| sequence == kea.as_slice()));
    }

    #[test]
    fn test_missing_branch_length() {
        let tree = parse_str("((Kea:0.1,Kaka):0.1,Kakapo:0.3);").unwrap();
        let mut simulator = JukesCantorSimulator::new(Alphabet::Dna, RateDistribution::Constant, Some(1));
        let err = simulator.simulate(&tree, PerSegmentWork::FixedCount(1)).unwrap_err();
        assert!(matches!(err, SimulatorError::MissingBranchLength { .. }));
    }

    #[test]
    fn test_invalid_rate_in_slice() {
        let mut simulator = JukesCantorSimulator::new(Alphabet::Dna, RateDistribution::Constant, Some(1));
        let err = simulator
            .simulate(&tree(), PerSegmentWork::RateSlice(&[1.0, f64::NAN]))
            .unwrap_err();
        assert!(matches!(err, SimulatorError::InvalidRate { site: 1, rate } if rate.is_nan()));
    }

    #[test]
    fn test_long_branches_saturate() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let n = 20_000;
        let same = (0..n).filter(|_| evolve(&mut rng, 2, 4, 50.0) == 2).count();
        let fraction = same as f64 / n as f64;
        assert!((fraction - 0.25).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_gamma_shape_must_be_positive() {
        assert_eq!(RateDistribution::gamma(0.0).unwrap_err(), ConfigError::InvalidGammaShape(0.0));
        assert!(RateDistribution::gamma(f64::INFINITY).is_err());
    }
}
