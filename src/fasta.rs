//! FASTA output of simulated alignments.

use crate::simulation::MergedAlignment;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Number of sequence characters per line.
pub const LINE_WIDTH: usize = 60;

/// Writes the alignment as FASTA, wrapping sequences after [LINE_WIDTH] characters.
///
/// # Example
/// ```
/// use segsim::fasta::write_alignment;
/// use segsim::simulation::{MergedAlignment, SequenceBlock};
///
/// let mut block = SequenceBlock::new();
/// block.push("Tui", b"ACGT".to_vec());
///
/// let mut out = Vec::new();
/// write_alignment(&mut out, &MergedAlignment::from(block)).unwrap();
/// assert_eq!(out, b">Tui\nACGT\n");
/// ```
pub fn write_alignment<W: Write>(writer: &mut W, alignment: &MergedAlignment) -> io::Result<()> {
    for (name, sequence) in alignment.iter() {
        writeln!(writer, ">{}", name)?;
        for line in sequence.chunks(LINE_WIDTH) {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Writes the alignment as FASTA to a newly created file.
///
/// # Errors
/// Returns an I/O error if creating or writing the file fails.
pub fn write_alignment_file<P: AsRef<Path>>(path: P, alignment: &MergedAlignment) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_alignment(&mut writer, alignment)?;
    writer.flush()
}
