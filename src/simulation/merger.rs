//! Concatenation of per-segment blocks into one alignment.

use crate::error::ConsistencyError;
use crate::simulation::simulator::SequenceBlock;
use std::collections::{BTreeSet, HashMap};

// =#========================================================================#=
// MERGED ALIGNMENT
// =#========================================================================#=
/// Full alignment: per identifier, the concatenation of its sequences over
/// all segments, in segment order.
///
/// Identifiers keep the order of the first block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedAlignment {
    names: Vec<String>,
    sequences: Vec<Vec<u8>>,
}

impl MergedAlignment {
    /// Number of sequences.
    pub fn num_sequences(&self) -> usize {
        self.names.len()
    }

    /// Number of sites, i.e. the common sequence length.
    pub fn num_sites(&self) -> usize {
        self.sequences.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.sequences[i].as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.sequences.iter().map(Vec::as_slice))
    }
}

impl From<SequenceBlock> for MergedAlignment {
    fn from(block: SequenceBlock) -> Self {
        let (names, sequences) = block.into_parts().unzip();
        Self { names, sequences }
    }
}

// =#========================================================================#=
// MERGING
// =#========================================================================#=
/// Merges blocks, given in segment order, into one [MergedAlignment].
///
/// # Errors
/// * [ConsistencyError::DuplicateIdentifier] if a block repeats an identifier
/// * [ConsistencyError::IdentifierMismatch] if a block's identifiers differ
///   from those of the first block
/// * [ConsistencyError::LengthMismatch] if the sequences of a block differ
///   in length
///
/// # Example
/// ```
/// use segsim::simulation::{SequenceBlock, merge_blocks};
///
/// let mut first = SequenceBlock::new();
/// first.push("Tui", b"ACG".to_vec());
/// first.push("Kea", b"TTT".to_vec());
/// let mut second = SequenceBlock::new();
/// second.push("Kea", b"GG".to_vec());
/// second.push("Tui", b"CC".to_vec());
///
/// let alignment = merge_blocks(vec![first, second]).unwrap();
/// assert_eq!(alignment.get("Tui"), Some(&b"ACGCC"[..]));
/// assert_eq!(alignment.get("Kea"), Some(&b"TTTGG"[..]));
/// ```
pub fn merge_blocks(blocks: Vec<SequenceBlock>) -> Result<MergedAlignment, ConsistencyError> {
    let mut blocks = blocks.into_iter().enumerate();
    let Some((_, first)) = blocks.next() else {
        return Ok(MergedAlignment::default());
    };

    check_block(0, &first)?;
    let slots: HashMap<String, usize> = first
        .names()
        .iter()
        .enumerate()
        .map(|(slot, name)| (name.clone(), slot))
        .collect();

    let append = |mut merged: MergedAlignment,
                  (segment, block): (usize, SequenceBlock)|
     -> Result<MergedAlignment, ConsistencyError> {
        check_block(segment, &block)?;
        check_identifiers(segment, &slots, &block)?;
        for (name, sequence) in block.into_parts() {
            merged.sequences[slots[&name]].extend(sequence);
        }
        Ok(merged)
    };
    let merged = blocks.try_fold(MergedAlignment::from(first), append)?;

    log::debug!(
        "Merged alignment of {} sequences with {} sites",
        merged.num_sequences(),
        merged.num_sites()
    );
    Ok(merged)
}

/// Checks that identifiers are unique and sequences equally long.
fn check_block(segment: usize, block: &SequenceBlock) -> Result<(), ConsistencyError> {
    let mut seen = BTreeSet::new();
    let expected = block.iter().next().map_or(0, |(_, sequence)| sequence.len());

    for (identifier, sequence) in block.iter() {
        if !seen.insert(identifier) {
            return Err(ConsistencyError::DuplicateIdentifier {
                segment,
                identifier: identifier.to_string(),
            });
        }
        if sequence.len() != expected {
            return Err(ConsistencyError::LengthMismatch {
                segment,
                identifier: identifier.to_string(),
                expected,
                actual: sequence.len(),
            });
        }
    }

    Ok(())
}

/// Checks that `block` has exactly the identifiers of the first block.
/// Assumes identifiers of `block` are unique.
fn check_identifiers(
    segment: usize,
    slots: &HashMap<String, usize>,
    block: &SequenceBlock,
) -> Result<(), ConsistencyError> {
    let unexpected: Vec<String> = block
        .names()
        .iter()
        .filter(|name| !slots.contains_key(name.as_str()))
        .cloned()
        .collect();

    if unexpected.is_empty() && block.len() == slots.len() {
        return Ok(());
    }

    let present: BTreeSet<&str> = block.names().iter().map(String::as_str).collect();
    let mut missing: Vec<String> = slots
        .keys()
        .filter(|name| !present.contains(name.as_str()))
        .cloned()
        .collect();
    missing.sort();

    Err(ConsistencyError::IdentifierMismatch { segment, missing, unexpected })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(entries: &[(&str, &str)]) -> SequenceBlock {
        let mut block = SequenceBlock::new();
        for (name, sequence) in entries {
            block.push(*name, sequence.as_bytes().to_vec());
        }
        block
    }

    #[test]
    fn test_single_block_is_unchanged() {
        let only = block(&[("Kea", "ACGT"), ("Kaka", "TTGA")]);
        let merged = merge_blocks(vec![only.clone()]).unwrap();
        assert_eq!(merged, MergedAlignment::from(only));
        assert_eq!(merged.num_sites(), 4);
    }

    #[test]
    fn test_concatenation_in_segment_order() {
        let merged = merge_blocks(vec![
            block(&[("Kea", "AAA"), ("Kaka", "CCC")]),
            block(&[("Kaka", "G"), ("Kea", "T")]),
            block(&[("Kea", ""), ("Kaka", "")]),
            block(&[("Kea", "CG"), ("Kaka", "AT")]),
        ])
        .unwrap();

        assert_eq!(merged.names(), &["Kea", "Kaka"]);
        assert_eq!(merged.get("Kea"), Some(&b"AAATCG"[..]));
        assert_eq!(merged.get("Kaka"), Some(&b"CCCGAT"[..]));
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_blocks(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_renamed_sequence() {
        let err = merge_blocks(vec![
            block(&[("Kea", "A"), ("Kaka", "C")]),
            block(&[("Kea", "A"), ("Kakapo", "C")]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::IdentifierMismatch {
                segment: 1,
                missing: vec!["Kaka".to_string()],
                unexpected: vec!["Kakapo".to_string()],
            }
        );
    }

    #[test]
    fn test_dropped_sequence() {
        let err = merge_blocks(vec![block(&[("Kea", "A"), ("Kaka", "C")]), block(&[("Kea", "A")])]).unwrap_err();
        assert!(matches!(err, ConsistencyError::IdentifierMismatch { segment: 1, .. }));
    }

    #[test]
    fn test_duplicate_and_ragged_blocks() {
        let err = merge_blocks(vec![block(&[("Kea", "A"), ("Kea", "C")])]).unwrap_err();
        assert!(matches!(err, ConsistencyError::DuplicateIdentifier { segment: 0, .. }));

        let err = merge_blocks(vec![
            block(&[("Kea", "A"), ("Kaka", "C")]),
            block(&[("Kea", "AC"), ("Kaka", "C")]),
        ])
        .unwrap_err();
        assert!(matches!(err, ConsistencyError::LengthMismatch { segment: 1, .. }));
    }
}
