use std::io::Write;

use crate::core::dna::Nuc;
use crate::core::pileup::ColumnPileup;

/// Dumps per-column nucleotide tallies as a tab-separated table. Positions
/// are 0-based reference coordinates.
pub fn write_counts<W: Write>(pileup: &ColumnPileup, saveto: W) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(saveto);
    writer.write_record(["pos", "A", "C", "G", "T", "-", "N"])?;
    for column in pileup.columns() {
        let counts = column.counts();
        writer.write_record([
            column.refpos().to_string(),
            counts[Nuc::A].to_string(),
            counts[Nuc::C].to_string(),
            counts[Nuc::G].to_string(),
            counts[Nuc::T].to_string(),
            counts[Nuc::Gap].to_string(),
            counts[Nuc::N].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
