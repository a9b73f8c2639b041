use std::collections::BTreeMap;

use crate::core::calling::errors::ErrorRates;
use crate::core::calling::performance::PerformanceMetrics;
use crate::core::dna::Codon;
use crate::core::pileup::{ColumnPileup, RowPileup};
use crate::core::read::AlignedRead;
use crate::core::stats::fisher_exact;
use crate::core::targets::{TargetConfig, TargetGene};
use crate::core::variants::{ColumnContext, GeneVariants, VariantCodon, VariantPosition};

/// Significance threshold for the Bonferroni-corrected codon tests.
pub const ALPHA: f64 = 0.01;
/// A site counts as variable when the tested codon is not dominant.
const VARIABLE_FREQ: f64 = 0.8;

/// Reporting policy switches.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CallerOptions {
    debug: bool,
    drm_only: bool,
    minimal_perc: f64,
    maximal_perc: f64,
}

impl Default for CallerOptions {
    fn default() -> Self {
        Self { debug: false, drm_only: false, minimal_perc: 0.0, maximal_perc: 100.0 }
    }
}

impl CallerOptions {
    pub fn new(debug: bool, drm_only: bool, minimal_perc: f64, maximal_perc: f64) -> Self {
        Self { debug, drm_only, minimal_perc, maximal_perc }
    }

    #[inline]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[inline]
    pub fn drm_only(&self) -> bool {
        self.drm_only
    }

    #[inline]
    pub fn minimal_perc(&self) -> f64 {
        self.minimal_perc
    }

    #[inline]
    pub fn maximal_perc(&self) -> f64 {
        self.maximal_perc
    }
}

/// Variant tables for all genes plus the validation tallies collected
/// while testing.
#[derive(Clone, PartialEq, Debug)]
pub struct CallOutcome {
    genes: Vec<GeneVariants>,
    metrics: PerformanceMetrics,
}

impl CallOutcome {
    #[inline]
    pub fn genes(&self) -> &[GeneVariants] {
        &self.genes
    }

    #[inline]
    pub fn genes_mut(&mut self) -> &mut [GeneVariants] {
        &mut self.genes
    }

    #[inline]
    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }
}

/// Codon-level minority variant caller over a pileup window.
pub struct VariantCaller {
    config: TargetConfig,
    rates: ErrorRates,
    options: CallerOptions,
}

impl VariantCaller {
    pub fn new(config: TargetConfig, rates: ErrorRates, options: CallerOptions) -> Self {
        Self { config, rates, options }
    }

    #[inline]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn call<R: AlignedRead>(&self, rows: &RowPileup<R>, columns: &ColumnPileup) -> CallOutcome {
        // Without a config the whole window is treated as a single ORF
        let fallback = [TargetGene::new("Unnamed ORF", rows.begin(), rows.end())];
        let genes = if self.config.genes().is_empty() {
            &fallback[..]
        } else {
            self.config.genes().as_slice()
        };

        let tests = self.count_tests(genes, rows);
        let mut metrics = PerformanceMetrics::new(tests, self.config.expected_minor_count());
        let has_minors = metrics.expected_minors() > 0;
        let has_reference = self.config.has_reference();

        let mut out = Vec::with_capacity(genes.len());
        for gene in genes {
            let mut table = GeneVariants::new(gene.name().clone(), *gene.begin());

            for start in (*gene.begin()..gene.end().saturating_sub(2)).step_by(3) {
                let winpos = start as i64 - rows.begin() as i64;
                let aapos = (1 + (start - gene.begin()) / 3) as u32;

                let codons = rows.codons_at(winpos);
                let coverage: u32 = codons.values().sum();
                if coverage == 0 {
                    continue;
                }
                let (majority, majority_count) = match find_majority(&codons) {
                    Some(x) => x,
                    None => continue,
                };

                let mut position = if has_reference {
                    let refcodon = self
                        .config
                        .reference_codon(start as usize)
                        .and_then(|x| Codon::from_symbols(x.as_bytes()));
                    let refcodon = match refcodon {
                        Some(x) => x,
                        None => continue,
                    };
                    let mut position = VariantPosition::new(refcodon);
                    // A dominant sample codon stands in for a diverged reference
                    if f64::from(majority_count) * 100.0 / f64::from(coverage)
                        > self.options.maximal_perc
                    {
                        position.set_alt_ref(majority);
                    }
                    position
                } else {
                    VariantPosition::new(majority)
                };

                for (candidate, count) in &codons {
                    if *candidate == position.ref_codon() {
                        continue;
                    }
                    if position.alt_ref_codon() == Some(*candidate) {
                        continue;
                    }

                    // Null hypothesis: the candidate arose from the reference
                    // by sequencing errors alone
                    let expected = f64::from(coverage)
                        * self
                            .rates
                            .codon_probability(position.ref_codon().symbols(), candidate.symbols());
                    let expected = expected.ceil() as u32;

                    let corrected =
                        fisher_exact(*count, coverage - count, expected, coverage - expected)
                            * tests as f64;
                    let pvalue = corrected.min(1.0);

                    let frequency = f64::from(*count) / f64::from(coverage);
                    let variable = frequency < VARIABLE_FREQ;
                    let predictor =
                        measure_performance(gene, *candidate, variable, aapos, pvalue, &mut metrics);

                    let aminoacid = candidate.aminoacid();
                    let drm =
                        self.config.find_drms(gene.name(), position.ref_aminoacid(), aapos, aminoacid);

                    let admitted = if self.options.debug {
                        true
                    } else if pvalue < ALPHA {
                        if self.options.drm_only {
                            !drm.is_empty()
                        } else if predictor {
                            true
                        } else if has_minors {
                            variable
                        } else {
                            true
                        }
                    } else {
                        false
                    };

                    if admitted && (self.options.debug || frequency * 100.0 >= self.options.minimal_perc)
                    {
                        position.record(aminoacid, VariantCodon::new(*candidate, frequency, pvalue, drm));
                    }
                }

                if position.is_variant() {
                    position.set_coverage(coverage);
                    self.attach_context(&mut position, start, columns, has_reference);
                }
                table.insert(aapos, position);
            }
            out.push(table);
        }

        CallOutcome { genes: out, metrics }
    }

    /// Bonferroni multiplier: distinct codons over all in-frame positions of
    /// all genes, at least 1.
    fn count_tests<R: AlignedRead>(&self, genes: &[TargetGene], rows: &RowPileup<R>) -> usize {
        let mut tests = 0;
        for gene in genes {
            for start in (*gene.begin()..gene.end().saturating_sub(2)).step_by(3) {
                let winpos = start as i64 - rows.begin() as i64;
                tests += rows.codons_at(winpos).len();
            }
        }
        tests.max(1)
    }

    /// Surrounding raw counts for reporting, columns [start-3, start+6)
    /// clipped to the pileup window.
    fn attach_context(
        &self,
        position: &mut VariantPosition,
        start: u64,
        columns: &ColumnPileup,
        has_reference: bool,
    ) {
        for rel in -3i64..6 {
            let pos = start as i64 + rel;
            if pos < 0 {
                continue;
            }
            if let Some(column) = columns.at(pos as u64) {
                let wildtype = if has_reference {
                    self.config.reference_base(pos as usize).unwrap_or(' ')
                } else {
                    column.max_base().map_or(' ', |x| x.symbol() as char)
                };
                position.push_context(ColumnContext::new(rel, pos as u64, *column.counts(), wildtype));
            }
        }
    }
}

/// Highest-count codon; ties keep the lexicographically first entry.
fn find_majority(codons: &BTreeMap<Codon, u32>) -> Option<(Codon, u32)> {
    let mut majority: Option<(Codon, u32)> = None;
    for (codon, count) in codons {
        match majority {
            Some((_, best)) if *count <= best => {}
            _ => majority = Some((*codon, *count)),
        }
    }
    majority
}

fn measure_performance(
    gene: &TargetGene,
    candidate: Codon,
    variable: bool,
    aapos: u32,
    pvalue: f64,
    metrics: &mut PerformanceMetrics,
) -> bool {
    let predictor =
        gene.minors().iter().any(|x| x.matches(aapos, candidate.aminoacid(), candidate.symbols()));
    metrics.record(predictor, variable, pvalue < ALPHA);
    predictor
}

#[cfg(test)]
mod tests {
    use crate::core::read::{AlignedBase, CigarOp, MemoryRead, QvThresholds};

    use super::*;

    fn mread(name: String, begin: u64, ops: &str, nucs: &str) -> MemoryRead {
        let bases = ops
            .bytes()
            .zip(nucs.bytes())
            .map(|(op, nuc)| AlignedBase::new(CigarOp::from_symbol(op).unwrap(), nuc))
            .collect();
        MemoryRead::new(name, begin, None, bases)
    }

    fn batch(counts: &[(&str, u32)]) -> Vec<MemoryRead> {
        let mut reads = Vec::new();
        for (nucs, count) in counts {
            for ind in 0..*count {
                let ops: String = "=".repeat(nucs.len());
                reads.push(mread(format!("{}-{}", nucs, ind), 0, &ops, nucs));
            }
        }
        reads
    }

    fn call(reads: &[MemoryRead], config: TargetConfig, options: CallerOptions) -> CallOutcome {
        let rows = RowPileup::new(reads, QvThresholds::default()).unwrap();
        let columns = ColumnPileup::build(&rows);
        VariantCaller::new(config, ErrorRates::default(), options).call(&rows, &columns)
    }

    #[test]
    fn quiet_sample() {
        let reads = batch(&[("AAACCCGGG", 10)]);
        let config = TargetConfig::load(
            r#"{"genes": [
                {"name": "orf", "begin": 0, "end": 9},
                {"name": "tail", "begin": 100, "end": 112}
            ]}"#,
        )
        .unwrap();

        let outcome = call(&reads, config, CallerOptions::default());
        assert_eq!(outcome.genes().len(), 2);

        let orf = &outcome.genes()[0];
        assert_eq!(orf.name(), "orf");
        assert_eq!(orf.positions().len(), 3);
        assert!(!orf.has_variants());
        for (aapos, expected) in [(1u32, b"AAA"), (2, b"CCC"), (3, b"GGG")] {
            let position = &orf.positions()[&aapos];
            assert_eq!(position.ref_codon(), Codon::from_symbols(expected).unwrap());
            assert!(!position.is_variant());
        }

        // No reads reach the second gene
        assert!(outcome.genes()[1].positions().is_empty());
        assert_eq!(outcome.metrics().tests(), 3);
    }

    #[test]
    fn minority_reported() {
        let reads = batch(&[("AAA", 950), ("AAC", 50)]);
        let config = TargetConfig::load(r#"{"genes": [{"name": "orf", "begin": 0, "end": 3}]}"#).unwrap();

        let outcome = call(&reads, config, CallerOptions::default());
        assert_eq!(outcome.metrics().tests(), 2);

        let position = &outcome.genes()[0].positions()[&1];
        assert!(position.is_variant());
        assert_eq!(position.ref_codon(), Codon::from_symbols(b"AAA").unwrap());
        assert_eq!(position.alt_ref_codon(), None);
        assert_eq!(position.coverage(), 1000);

        let codons = &position.variants()[&'N'];
        assert_eq!(codons.len(), 1);
        assert_eq!(codons[0].codon(), Codon::from_symbols(b"AAC").unwrap());
        assert!((codons[0].frequency() - 0.05).abs() < 1e-12);
        assert!(codons[0].pvalue() < ALPHA);
        assert!(codons[0].haplotype_hit().is_empty());

        // Context clipped to the window [0, 3)
        let context = position.context();
        assert_eq!(context.len(), 3);
    }

    #[test]
    fn alternative_reference() {
        let reads = batch(&[("AAC", 60), ("AAG", 40)]);
        let config = TargetConfig::load(
            r#"{"referenceSequence": "AAA", "genes": [{"name": "orf", "begin": 0, "end": 3}]}"#,
        )
        .unwrap();

        let options = CallerOptions::new(false, false, 0.0, 50.0);
        let outcome = call(&reads, config, options);

        let position = &outcome.genes()[0].positions()[&1];
        assert_eq!(position.ref_codon(), Codon::from_symbols(b"AAA").unwrap());
        // Majority exceeds 50% of the coverage, so it shadows the reference
        assert_eq!(position.alt_ref_codon(), Some(Codon::from_symbols(b"AAC").unwrap()));

        // AAC is the alternative reference and must not be reported itself
        assert!(!position.variants().contains_key(&'N'));
        let codons = &position.variants()[&'R'];
        assert_eq!(codons[0].codon(), Codon::from_symbols(b"AAG").unwrap());
        assert!((codons[0].frequency() - 0.4).abs() < 1e-12);

        // Wildtype comes from the reference sequence
        assert!(position.context().iter().all(|x| {
            let value = serde_json::to_value(x).unwrap();
            value["wt"] == "A"
        }));
    }

    #[test]
    fn drm_only_policy() {
        let reads = batch(&[("AAATTT", 900), ("AACTTA", 100)]);
        let config = TargetConfig::load(
            r#"{"genes": [{
                "name": "pol", "begin": 0, "end": 6,
                "drms": [{"name": "DrugX", "positions": [{"pos": 2}]}]
            }]}"#,
        )
        .unwrap();

        let options = CallerOptions::new(false, true, 0.0, 100.0);
        let outcome = call(&reads, config, options);

        let positions = outcome.genes()[0].positions();
        // No DRM is catalogued at the first codon
        assert!(!positions[&1].is_variant());

        let codons = &positions[&2].variants()[&'L'];
        assert_eq!(codons[0].codon(), Codon::from_symbols(b"TTA").unwrap());
        assert_eq!(codons[0].known_drm(), "DrugX");
    }

    #[test]
    fn minimal_percentage_gate() {
        let reads = batch(&[("AAA", 3980), ("AAC", 20)]);
        let config = TargetConfig::load(r#"{"genes": [{"name": "orf", "begin": 0, "end": 3}]}"#).unwrap();

        // 0.5% frequency is highly significant at this coverage, but stays
        // below the reporting threshold
        let outcome = call(&reads, config.clone(), CallerOptions::new(false, false, 1.0, 100.0));
        assert!(!outcome.genes()[0].has_variants());

        // Debug mode bypasses both significance and the threshold
        let outcome = call(&reads, config, CallerOptions::new(true, false, 1.0, 100.0));
        let position = &outcome.genes()[0].positions()[&1];
        assert!(position.is_variant());
        assert!((position.variants()[&'N'][0].frequency() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn expected_minor_tallies() {
        let reads = batch(&[("AAA", 920), ("AAC", 50), ("AAG", 30)]);
        let config = TargetConfig::load(
            r#"{"genes": [{
                "name": "orf", "begin": 0, "end": 3,
                "expectedMinors": [{"position": 1, "aminoacid": "N", "codon": "AAC"}]
            }]}"#,
        )
        .unwrap();

        let outcome = call(&reads, config, CallerOptions::default());
        let metrics = outcome.metrics();
        assert_eq!(metrics.tests(), 3);
        assert_eq!(metrics.expected_minors(), 1);
        assert_eq!(metrics.true_positives(), 1);
        assert_eq!(metrics.false_positives(), 1);
        assert!((metrics.true_positive_rate() - 1.0).abs() < 1e-12);
        assert!((metrics.false_positive_rate() - 0.5).abs() < 1e-12);

        // Both minorities are variable sites and stay reported
        let position = &outcome.genes()[0].positions()[&1];
        assert!(position.variants().contains_key(&'N'));
        assert!(position.variants().contains_key(&'R'));
    }
}
