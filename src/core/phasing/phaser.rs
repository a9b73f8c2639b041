use serde::Serialize;

use crate::core::phasing::haplotype::{Haplotype, HaplotypeFlags};
use crate::core::pileup::RowPileup;
use crate::core::read::AlignedRead;
use crate::core::variants::{GeneVariants, VariantPosition};

const MIN_HAPLOTYPE_READS: f64 = 10.0;
const ALPHABET: usize = 26;

/// Hard read tallies of the haplotype quality classes. Marginal bins
/// overlap; a read with several defects is counted in each matching bin.
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug, Serialize)]
pub struct FilteredCounts {
    pub healthy_reported: usize,
    pub healthy_low_coverage: usize,
    pub all_damaged: usize,
    pub marginal_with_gaps: usize,
    pub marginal_with_heteroduplexes: usize,
    pub marginal_partial_reads: usize,
}

/// Ranked clean haplotypes plus everything that was filtered out on the way.
#[derive(Clone, PartialEq, Debug)]
pub struct Phasing {
    haplotypes: Vec<Haplotype>,
    filtered: Vec<Haplotype>,
    counts: FilteredCounts,
}

impl Phasing {
    #[inline]
    pub fn haplotypes(&self) -> &[Haplotype] {
        &self.haplotypes
    }

    #[inline]
    pub fn filtered(&self) -> &[Haplotype] {
        &self.filtered
    }

    #[inline]
    pub fn counts(&self) -> &FilteredCounts {
        &self.counts
    }
}

/// Groups reads by their exact codon observations over all variant
/// positions and turns the clean clusters into reportable haplotypes.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct HaplotypePhaser {
    min_reads: f64,
}

impl Default for HaplotypePhaser {
    fn default() -> Self {
        Self { min_reads: MIN_HAPLOTYPE_READS }
    }
}

impl HaplotypePhaser {
    pub fn new(min_reads: f64) -> Self {
        Self { min_reads }
    }

    /// Phases reads over the variant positions of the called genes and
    /// records for every reported variant codon which haplotype carries it,
    /// in rank order.
    pub fn phase<R: AlignedRead>(&self, rows: &RowPileup<R>, genes: &mut [GeneVariants]) -> Phasing {
        // Absolute codon starts of the variant positions, gene by gene
        let positions: Vec<(u64, &VariantPosition)> = genes
            .iter()
            .flat_map(|gene| {
                gene.positions()
                    .iter()
                    .filter(|(_, position)| position.is_variant())
                    .map(move |(aapos, position)| {
                        (gene.offset() + (u64::from(*aapos) - 1) * 3, position)
                    })
            })
            .collect();

        let mut observations: Vec<Haplotype> = Vec::new();
        for row in rows.rows() {
            let mut codons = Vec::with_capacity(positions.len());
            let mut flags = HaplotypeFlags::default();
            for (start, position) in &positions {
                let codon = row.codon_at(*start as i64 - rows.begin() as i64);
                if !position.is_hit(&codon) {
                    flags.add(HaplotypeFlags::OFFTARGET);
                }
                codons.push(codon);
            }

            match observations.iter_mut().find(|x| x.codons() == codons.as_slice()) {
                Some(cluster) => cluster.add_read(row.read().name().to_string()),
                None => observations.push(Haplotype::new(row.read().name().to_string(), codons, flags)),
            }
        }

        let mut haplotypes = Vec::new();
        let mut filtered = Vec::new();
        for mut cluster in observations {
            if cluster.size() < self.min_reads {
                cluster.add_flag(HaplotypeFlags::LOW_COV);
            }
            if cluster.flags().is_clean() {
                haplotypes.push(cluster);
            } else {
                filtered.push(cluster);
            }
        }

        // Rank by size; equally sized clusters keep their discovery order
        haplotypes.sort_by(|a, b| b.size().total_cmp(&a.size()));

        let total: f64 = haplotypes.iter().map(Haplotype::size).sum();
        let doubled = haplotypes.len() > ALPHABET;
        for (ind, haplotype) in haplotypes.iter_mut().enumerate() {
            haplotype.set_frequency(haplotype.size() / total);
            haplotype.set_name(rank_name(ind, doubled));
        }

        for haplotype in &haplotypes {
            let mut ind = 0;
            for gene in genes.iter_mut() {
                for position in gene.positions_mut().values_mut() {
                    if !position.is_variant() {
                        continue;
                    }
                    let codon = haplotype.codon(ind);
                    for codons in position.variants_mut().values_mut() {
                        for variant in codons {
                            variant.record_hit(variant.codon().symbols() == codon);
                        }
                    }
                    ind += 1;
                }
            }
        }

        let mut counts = FilteredCounts::default();
        counts.healthy_reported = haplotypes.iter().map(|x| x.read_names().len()).sum();
        for haplotype in &filtered {
            let reads = haplotype.read_names().len();
            let flags = haplotype.flags();
            if flags == HaplotypeFlags::LOW_COV {
                counts.healthy_low_coverage += reads;
            }
            if flags.contains(HaplotypeFlags::OFFTARGET) {
                counts.all_damaged += reads;
            }
            if flags.contains(HaplotypeFlags::WITH_GAP) {
                counts.marginal_with_gaps += reads;
            }
            if flags.contains(HaplotypeFlags::WITH_HETERODUPLEX) {
                counts.marginal_with_heteroduplexes += reads;
            }
            if flags.contains(HaplotypeFlags::PARTIAL) {
                counts.marginal_partial_reads += reads;
            }
        }

        Phasing { haplotypes, filtered, counts }
    }
}

/// A..Z while the single alphabet suffices, Aa..Zz style beyond it.
fn rank_name(ind: usize, doubled: bool) -> String {
    if doubled {
        let first = char::from(b'A' + (ind / ALPHABET) as u8);
        let second = char::from(b'a' + (ind % ALPHABET) as u8);
        format!("{}{}", first, second)
    } else {
        char::from(b'A' + ind as u8).to_string()
    }
}
