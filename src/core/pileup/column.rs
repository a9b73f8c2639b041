use std::collections::BTreeMap;
use std::ops::{Index, Range};

use bio_types::genome::Position;

use crate::core::dna::{Nuc, NucCounts};
use crate::core::pileup::RowPileup;
use crate::core::read::AlignedRead;

/// Statistics attached to a column after running per-tag tests.
/// P-values start at 1.0 (nothing significant).
#[derive(Clone, PartialEq, Debug)]
pub struct ColumnStats {
    pub pvalues: [f64; 6],
    pub significant: [bool; 6],
    pub insertion_pvalues: BTreeMap<String, f64>,
    pub argmax: Option<Nuc>,
    pub hit: bool,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self { pvalues: [1.0; 6], significant: [false; 6], insertion_pvalues: BTreeMap::new(), argmax: None, hit: false }
    }
}

impl ColumnStats {
    #[inline]
    pub fn pvalue(&self, nuc: Nuc) -> f64 {
        self.pvalues[nuc as usize]
    }

    pub fn significant_insertions(&self, alpha: f64) -> Vec<&str> {
        self.insertion_pvalues.iter().filter(|(_, &p)| p < alpha).map(|(seq, _)| seq.as_str()).collect()
    }
}

/// Per-reference-column tallies: six tag counters plus observed insertions
/// keyed by the inserted sequence.
#[derive(Clone, Debug)]
pub struct PileupColumn {
    refpos: Position,
    counts: NucCounts,
    insertions: BTreeMap<String, u32>,
    stats: Option<ColumnStats>,
}

impl PileupColumn {
    fn new(refpos: Position) -> Self {
        Self { refpos, counts: NucCounts::zeros(), insertions: BTreeMap::new(), stats: None }
    }

    #[inline]
    pub fn refpos(&self) -> Position {
        self.refpos
    }

    #[inline]
    pub fn counts(&self) -> &NucCounts {
        &self.counts
    }

    #[inline]
    pub fn coverage(&self) -> u32 {
        self.counts.coverage()
    }

    /// Share of the tag among all tallies. NaN at zero coverage; callers
    /// must check the coverage first.
    #[inline]
    pub fn frequency(&self, nuc: Nuc) -> f64 {
        self.counts[nuc] as f64 / self.counts.coverage() as f64
    }

    /// Most frequent tag, ties to the leftmost of {A, C, G, T, -}. An N
    /// argmax means there is no confident call.
    #[inline]
    pub fn max_base(&self) -> Option<Nuc> {
        let (argmax, _) = self.counts.mostfreq();
        if argmax == Nuc::N {
            None
        } else {
            Some(argmax)
        }
    }

    #[inline]
    pub fn insertions(&self) -> &BTreeMap<String, u32> {
        &self.insertions
    }

    #[inline]
    pub fn stats(&self) -> Option<&ColumnStats> {
        self.stats.as_ref()
    }

    pub fn attach_stats(&mut self, stats: ColumnStats) {
        self.stats = Some(stats);
    }

    fn add_insertion(&mut self, seq: &str) {
        *self.insertions.entry(seq.to_string()).or_insert(0) += 1;
    }
}

/// Columns over the row pileup's window, indexed by absolute position.
pub struct ColumnPileup {
    begin: Position,
    end: Position,
    columns: Vec<PileupColumn>,
}

impl ColumnPileup {
    pub fn build<R: AlignedRead>(pileup: &RowPileup<R>) -> Self {
        let Range { start: begin, end } = pileup.window();
        let mut columns: Vec<PileupColumn> = (begin..end).map(PileupColumn::new).collect();

        for row in pileup.rows() {
            for (offset, slot) in row.bases().iter().enumerate() {
                if let Some(nuc) = slot {
                    columns[offset].counts.increment(*nuc);
                }
            }
            for (offset, seq) in row.insertions() {
                // Flushed at/past the window end: no column to attach to
                if let Some(column) = columns.get_mut(*offset) {
                    column.add_insertion(seq);
                }
            }
        }

        Self { begin, end, columns }
    }

    #[inline]
    pub fn window(&self) -> Range<Position> {
        self.begin..self.end
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.begin && pos < self.end
    }

    #[inline]
    pub fn at(&self, pos: Position) -> Option<&PileupColumn> {
        if self.contains(pos) {
            Some(&self.columns[(pos - self.begin) as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn at_mut(&mut self, pos: Position) -> Option<&mut PileupColumn> {
        if self.contains(pos) {
            Some(&mut self.columns[(pos - self.begin) as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn columns(&self) -> &[PileupColumn] {
        &self.columns
    }
}

impl Index<Position> for ColumnPileup {
    type Output = PileupColumn;

    fn index(&self, pos: Position) -> &Self::Output {
        self.at(pos).unwrap_or_else(|| panic!("Position {} is outside of the pileup window", pos))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::read::{AlignedBase, CigarOp, MemoryRead, QvThresholds};

    use super::*;

    fn mread(name: &str, begin: Position, ops: &str, nucs: &str) -> MemoryRead {
        let bases = ops
            .bytes()
            .zip(nucs.bytes())
            .map(|(op, nuc)| AlignedBase::new(CigarOp::from_symbol(op).unwrap(), nuc))
            .collect();
        MemoryRead::new(name, begin, None, bases)
    }

    fn build(reads: &[MemoryRead]) -> ColumnPileup {
        ColumnPileup::build(&RowPileup::new(reads, QvThresholds::default()).unwrap())
    }

    #[test]
    fn counts_match_rows() {
        let reads = vec![
            mread("r1", 0, "====", "ACGT"),
            mread("r2", 0, "=D==", "A-GA"),
            mread("r3", 1, "==", "CG"),
            mread("r4", 2, "==", "NT"),
        ];
        let columns = build(&reads);

        assert_eq!(columns.window(), 0..4);
        assert_eq!(columns[0].counts(), &NucCounts { A: 2, C: 0, G: 0, T: 0, Gap: 0, N: 0 });
        assert_eq!(columns[1].counts(), &NucCounts { A: 0, C: 2, G: 0, T: 0, Gap: 1, N: 0 });
        assert_eq!(columns[2].counts(), &NucCounts { A: 0, C: 0, G: 3, T: 0, Gap: 0, N: 1 });
        assert_eq!(columns[3].counts(), &NucCounts { A: 1, C: 0, G: 0, T: 2, Gap: 0, N: 0 });

        // Column sums equal the number of covering, non-blank rows
        for (pos, covering) in [(0u64, 2u32), (1, 3), (2, 4), (3, 3)] {
            assert_eq!(columns[pos].coverage(), covering);
        }
    }

    #[test]
    fn insertion_aggregation() {
        let reads = vec![
            mread("r1", 0, "=II==", "ACGTA"),
            mread("r2", 0, "=II==", "ACGTA"),
            mread("r3", 0, "=IP==", "ATCGA"),
            // Insertion flushed exactly at the window end is dropped
            mread("r4", 0, "===IP", "ACGTT"),
        ];
        let columns = build(&reads);

        assert_eq!(columns.window(), 0..3);
        assert_eq!(
            columns[1].insertions(),
            &BTreeMap::from([("CG".to_string(), 2), ("T".to_string(), 1)])
        );
        assert!(columns[0].insertions().is_empty());
        assert!(columns[2].insertions().is_empty());
    }

    #[test]
    fn max_base_and_frequency() {
        let reads = vec![
            mread("r1", 0, "===", "ANT"),
            mread("r2", 0, "===", "ANT"),
            mread("r3", 0, "===", "ANN"),
            mread("r4", 0, "=D=", "A-T"),
        ];
        let columns = build(&reads);

        assert_eq!(columns[0].max_base(), Some(Nuc::A));
        assert!((columns[0].frequency(Nuc::A) - 1.0).abs() < 1e-12);

        // N is the argmax: no confident call
        assert_eq!(columns[1].max_base(), None);
        assert!((columns[1].frequency(Nuc::Gap) - 0.25).abs() < 1e-12);

        assert_eq!(columns[2].max_base(), Some(Nuc::T));
    }

    #[test]
    fn window_lookup() {
        let columns = build(&[mread("r1", 10, "===", "ACG")]);

        assert!(columns.contains(10) && columns.contains(12));
        assert!(!columns.contains(9) && !columns.contains(13));
        assert!(columns.at(11).is_some());
        assert!(columns.at(13).is_none());
        assert_eq!(columns[12].refpos(), 12);
    }

    #[test]
    #[should_panic]
    fn out_of_window_index_panics() {
        let columns = build(&[mread("r1", 10, "===", "ACG")]);
        let _ = &columns[13];
    }

    #[test]
    fn attached_stats() {
        let mut columns = build(&[mread("r1", 0, "===", "ACG")]);
        assert!(columns[0].stats().is_none());

        let mut stats = ColumnStats::default();
        assert_eq!(stats.pvalue(Nuc::A), 1.0);
        stats.pvalues[Nuc::T as usize] = 0.001;
        stats.significant[Nuc::T as usize] = true;
        stats.argmax = Some(Nuc::A);
        stats.hit = true;
        stats.insertion_pvalues.insert("AC".to_string(), 0.002);
        stats.insertion_pvalues.insert("G".to_string(), 0.5);

        columns.at_mut(0).unwrap().attach_stats(stats);
        let attached = columns[0].stats().unwrap();
        assert_eq!(attached.pvalue(Nuc::T), 0.001);
        assert_eq!(attached.significant_insertions(0.01), vec!["AC"]);
    }
}
