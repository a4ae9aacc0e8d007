//! Character states of simulated sequences.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

const DNA_STATES: &[u8] = b"ACGT";
const RNA_STATES: &[u8] = b"ACGU";
const PROTEIN_STATES: &[u8] = b"ARNDCQEGHILKMFPSTWYV";

/// Alphabet of the simulated sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alphabet {
    #[default]
    Dna,
    Rna,
    Protein,
}

impl Alphabet {
    /// State characters, in state-index order.
    pub fn states(&self) -> &'static [u8] {
        match self {
            Alphabet::Dna => DNA_STATES,
            Alphabet::Rna => RNA_STATES,
            Alphabet::Protein => PROTEIN_STATES,
        }
    }

    /// Number of states.
    pub fn size(&self) -> usize {
        self.states().len()
    }

    /// Character of state `index`.
    ///
    /// # Panics
    /// If `index >= self.size()`.
    pub fn symbol(&self, index: usize) -> u8 {
        self.states()[index]
    }
}

impl FromStr for Alphabet {
    type Err = ConfigError;

    /// Parses `DNA`, `RNA` or `Protein` (case-insensitive; `AA` for proteins).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" | "nucleotide" => Ok(Alphabet::Dna),
            "rna" => Ok(Alphabet::Rna),
            "protein" | "proteins" | "aa" => Ok(Alphabet::Protein),
            _ => Err(ConfigError::UnknownAlphabet(s.to_string())),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alphabet::Dna => "DNA",
            Alphabet::Rna => "RNA",
            Alphabet::Protein => "Protein",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for alphabet in [Alphabet::Dna, Alphabet::Rna, Alphabet::Protein] {
            assert_eq!(alphabet.to_string().parse::<Alphabet>(), Ok(alphabet));
        }
        assert_eq!("aa".parse::<Alphabet>(), Ok(Alphabet::Protein));
        assert!("Codon".parse::<Alphabet>().is_err());
    }

    #[test]
    fn test_sizes() {
        assert_eq!(Alphabet::Dna.size(), 4);
        assert_eq!(Alphabet::Protein.size(), 20);
        assert_eq!(Alphabet::Rna.symbol(3), b'U');
    }
}
