use std::collections::BTreeMap;
use std::ops::Range;

use bio_types::genome::Position;
use rayon::prelude::*;

use crate::core::dna::{Codon, Nuc, BLANK};
use crate::core::pileup::PileupError;
use crate::core::read::{AlignedRead, CigarOp, QvThresholds};

/// One read rendered onto the common reference window. Slots outside the
/// read's span stay `None` (blank).
pub struct PileupRow<'a, R: AlignedRead> {
    read: &'a R,
    bases: Vec<Option<Nuc>>,
    insertions: BTreeMap<usize, String>,
}

impl<'a, R: AlignedRead> PileupRow<'a, R> {
    fn build(read: &'a R, begin: Position, rowlen: usize, thresholds: &QvThresholds) -> Result<Self, PileupError> {
        debug_assert!(read.begin() >= begin && (read.end() - begin) as usize <= rowlen);

        let mut bases = vec![None; rowlen];
        let mut insertions = BTreeMap::new();
        let mut pending = String::new();
        let mut cursor = (read.begin() - begin) as usize;

        for base in read.bases() {
            match base.op() {
                CigarOp::Match | CigarOp::Subst => {
                    Self::flush(&mut pending, &mut insertions, cursor);
                    let nuc = Nuc::from_symbol(base.nuc()).ok_or_else(|| PileupError::UnexpectedSymbol {
                        read: read.name().to_string(),
                        symbol: base.nuc() as char,
                    })?;
                    bases[cursor] = Some(if base.meets(thresholds) { nuc } else { Nuc::N });
                    cursor += 1;
                }
                CigarOp::Del => {
                    Self::flush(&mut pending, &mut insertions, cursor);
                    bases[cursor] = Some(Nuc::Gap);
                    cursor += 1;
                }
                CigarOp::Ins => {
                    pending.push(base.nuc().to_ascii_uppercase() as char);
                }
                CigarOp::Pad | CigarOp::SoftClip => {
                    Self::flush(&mut pending, &mut insertions, cursor);
                }
            }
        }
        // An insertion never followed by another op is dropped
        Ok(Self { read, bases, insertions })
    }

    fn flush(pending: &mut String, insertions: &mut BTreeMap<usize, String>, cursor: usize) {
        if !pending.is_empty() {
            insertions.insert(cursor, std::mem::take(pending));
        }
    }

    #[inline]
    pub fn read(&self) -> &R {
        self.read
    }

    #[inline]
    pub fn bases(&self) -> &[Option<Nuc>] {
        &self.bases
    }

    #[inline]
    pub fn insertions(&self) -> &BTreeMap<usize, String> {
        &self.insertions
    }

    /// Fully resolved coding codon at the window-relative position, if the
    /// read covers all three slots with non-gap nucleotides.
    pub fn coding_codon_at(&self, pos: i64) -> Option<Codon> {
        if pos < 0 || pos + 2 >= self.bases.len() as i64 {
            return None;
        }
        let pos = pos as usize;
        let mut triplet = [Nuc::N; 3];
        for (ind, nuc) in triplet.iter_mut().enumerate() {
            *nuc = self.bases[pos + ind]?;
        }
        Codon::new(triplet)
    }

    /// Raw codon symbols at the window-relative position, blank-padded for
    /// slots outside the window or not covered by the read.
    pub fn codon_at(&self, pos: i64) -> [u8; 3] {
        let mut codon = [BLANK; 3];
        for (ind, symbol) in codon.iter_mut().enumerate() {
            let at = pos + ind as i64;
            if at >= 0 && at < self.bases.len() as i64 {
                if let Some(nuc) = self.bases[at as usize] {
                    *symbol = nuc.symbol();
                }
            }
        }
        codon
    }
}

/// All reads rendered onto their common window [begin, end) =
/// min/max envelope of the read spans. Row order matches input order.
pub struct RowPileup<'a, R: AlignedRead> {
    begin: Position,
    end: Position,
    rows: Vec<PileupRow<'a, R>>,
}

impl<'a, R: AlignedRead + Sync> RowPileup<'a, R> {
    pub fn new(reads: &'a [R], thresholds: QvThresholds) -> Result<Self, PileupError> {
        assert!(!reads.is_empty(), "Pileup requires at least one aligned read");

        let begin = reads.iter().map(|x| x.begin()).min().unwrap();
        let end = reads.iter().map(|x| x.end()).max().unwrap();
        debug_assert!(end >= begin);
        let rowlen = (end - begin) as usize;

        let rows = reads
            .par_iter()
            .map(|read| PileupRow::build(read, begin, rowlen, &thresholds))
            .collect::<Result<Vec<_>, PileupError>>()?;

        Ok(Self { begin, end, rows })
    }
}

impl<'a, R: AlignedRead> RowPileup<'a, R> {
    #[inline]
    pub fn window(&self) -> Range<Position> {
        self.begin..self.end
    }

    #[inline]
    pub fn begin(&self) -> Position {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> Position {
        self.end
    }

    #[inline]
    pub fn rows(&self) -> &[PileupRow<'a, R>] {
        &self.rows
    }

    /// Distinct coding codons with their read support at the given
    /// window-relative position, in lexicographic codon order.
    pub fn codons_at(&self, pos: i64) -> BTreeMap<Codon, u32> {
        let mut codons = BTreeMap::new();
        for row in &self.rows {
            if let Some(codon) = row.coding_codon_at(pos) {
                *codons.entry(codon).or_insert(0) += 1;
            }
        }
        codons
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use crate::core::read::{AlignedBase, MemoryRead, MockRead};

    use super::*;

    fn mread(name: &str, begin: Position, ops: &str, nucs: &str) -> MemoryRead {
        assert_eq!(ops.len(), nucs.len());
        let bases = ops
            .bytes()
            .zip(nucs.bytes())
            .map(|(op, nuc)| AlignedBase::new(CigarOp::from_symbol(op).unwrap(), nuc))
            .collect();
        MemoryRead::new(name, begin, None, bases)
    }

    fn symbols<R: AlignedRead>(row: &PileupRow<R>) -> String {
        row.bases().iter().map(|x| x.map_or(' ', |nuc| nuc.symbol() as char)).collect()
    }

    #[test]
    fn window_envelope() {
        let reads =
            vec![mread("r1", 5, "=====", "ACGTA"), mread("r2", 8, "========", "ACGTACGT"), mread("r3", 0, "====", "ACGT")];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();

        assert_eq!(pileup.window(), 0..16);
        assert_eq!(pileup.rows().len(), 3);
        for (row, read) in pileup.rows().iter().zip(&reads) {
            assert_eq!(row.read().name(), read.name());
            assert_eq!(row.bases().len(), 16);
        }
    }

    #[test]
    fn row_filling() {
        let reads = vec![
            mread("matches", 2, "=X=", "ACG"),
            mread("deletion", 0, "=D==", "A-CG"),
            mread("insertion", 1, "=II=", "ACGT"),
        ];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        assert_eq!(pileup.window(), 0..5);

        assert_eq!(symbols(&pileup.rows()[0]), "  ACG");
        assert!(pileup.rows()[0].insertions().is_empty());

        assert_eq!(symbols(&pileup.rows()[1]), "A-CG ");
        assert!(pileup.rows()[1].insertions().is_empty());

        assert_eq!(symbols(&pileup.rows()[2]), " A T ");
        assert_eq!(pileup.rows()[2].insertions(), &BTreeMap::from([(2, "CG".to_string())]));
    }

    #[test]
    fn insertion_flush_on_pad_and_clip() {
        let reads = [mread("r", 0, "=IIP=", "ACGTA")];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        assert_eq!(symbols(&pileup.rows()[0]), "AA");
        assert_eq!(pileup.rows()[0].insertions(), &BTreeMap::from([(1, "CG".to_string())]));

        let reads = [mread("r", 0, "==ISS", "ACGTA")];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        assert_eq!(symbols(&pileup.rows()[0]), "AC");
        assert_eq!(pileup.rows()[0].insertions(), &BTreeMap::from([(2, "G".to_string())]));
    }

    #[test]
    fn trailing_insertion_dropped() {
        let reads = [mread("r", 0, "==II", "ACGT")];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        assert_eq!(symbols(&pileup.rows()[0]), "AC");
        assert!(pileup.rows()[0].insertions().is_empty());
    }

    #[test]
    fn below_threshold_bases_become_n() {
        let bases = vec![
            AlignedBase::with_qual(CigarOp::Match, b'A', 30),
            AlignedBase::with_qual(CigarOp::Match, b'C', 10),
            // No quality channel at all: passes
            AlignedBase::new(CigarOp::Match, b'G'),
        ];
        let reads = vec![MemoryRead::new("r", 0, None, bases)];

        let pileup = RowPileup::new(&reads, QvThresholds::new(Some(20), None, None, None)).unwrap();
        assert_eq!(symbols(&pileup.rows()[0]), "ANG");

        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        assert_eq!(symbols(&pileup.rows()[0]), "ACG");
    }

    #[test]
    fn unexpected_symbol_is_fatal() {
        let reads = vec![mread("weird", 0, "==", "AR")];
        let result = RowPileup::new(&reads, QvThresholds::default());
        assert_eq!(result.err(), Some(PileupError::UnexpectedSymbol { read: "weird".to_string(), symbol: 'R' }));
    }

    #[test]
    fn coding_codons() {
        let reads = [mread("r", 1, "====D===", "ACGT-ACG")];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        let row = &pileup.rows()[0];

        assert_eq!(row.coding_codon_at(0), Codon::from_symbols(b"ACG"));
        assert_eq!(row.coding_codon_at(1), Codon::from_symbols(b"CGT"));
        // Spans the deletion
        assert_eq!(row.coding_codon_at(2), None);
        assert_eq!(row.coding_codon_at(3), None);
        assert_eq!(row.coding_codon_at(4), None);
        assert_eq!(row.coding_codon_at(5), Codon::from_symbols(b"ACG"));
        // Out of range / partially blank
        assert_eq!(row.coding_codon_at(-1), None);
        assert_eq!(row.coding_codon_at(6), None);
    }

    #[test]
    fn raw_codons_are_blank_padded() {
        let reads = [mread("r", 1, "==D=", "AC-G")];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        let row = &pileup.rows()[0];

        assert_eq!(&row.codon_at(-1), b" AC");
        assert_eq!(&row.codon_at(0), b"AC-");
        assert_eq!(&row.codon_at(1), b"C-G");
        assert_eq!(&row.codon_at(2), b"-G ");
        assert_eq!(&row.codon_at(3), b"G  ");
        assert_eq!(&row.codon_at(100), b"   ");
    }

    #[test]
    fn codon_aggregation() {
        let reads = vec![
            mread("r1", 0, "===", "AAA"),
            mread("r2", 0, "===", "AAA"),
            mread("r3", 0, "===", "AAC"),
            mread("r4", 0, "=D=", "A-C"),
            mread("r5", 1, "==", "AC"),
        ];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();

        let codons = pileup.codons_at(0);
        assert_eq!(codons.len(), 2);
        assert_eq!(codons[&Codon::from_symbols(b"AAA").unwrap()], 2);
        assert_eq!(codons[&Codon::from_symbols(b"AAC").unwrap()], 1);
        assert!(pileup.codons_at(1).is_empty());
    }

    #[test]
    fn mocked_reads() {
        let mut read = MockRead::new();
        read.expect_begin().return_const(5u64);
        read.expect_end().return_const(7u64);
        read.expect_bases()
            .return_const(vec![AlignedBase::new(CigarOp::Match, b'A'), AlignedBase::new(CigarOp::Subst, b'T')]);

        let reads = vec![read];
        let pileup = RowPileup::new(&reads, QvThresholds::default()).unwrap();
        assert_eq!(pileup.window(), 5..7);
        assert_eq!(symbols(&pileup.rows()[0]), "AT");
    }
}
