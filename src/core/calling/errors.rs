use derive_getters::Getters;

use crate::core::dna::Nuc;
use crate::core::pileup::ColumnPileup;

// Current long-read amplicon profile; sums to one with 3x the per-base
// substitution rate
const MATCH: f64 = 0.9956844883;
const SUBSTITUTION: f64 = 0.0005244257;
const DELETION: f64 = 0.003791086;

// Chemistries predating the profiled ones
const UNPROFILED: &[&str] = &["P6-C4", "S/P1-C1/beta"];

/// Per-base alignment error model. `substitution` is the probability of
/// substituting into one specific target base (a third of the total
/// substitution rate).
#[derive(Clone, Copy, PartialEq, Debug, Getters)]
pub struct ErrorRates {
    matched: f64,
    substitution: f64,
    deletion: f64,
    insertion: f64,
}

impl Default for ErrorRates {
    fn default() -> Self {
        Self { matched: MATCH, substitution: SUBSTITUTION / 3.0, deletion: DELETION, insertion: 0.0 }
    }
}

impl ErrorRates {
    pub fn from_rates(substitution: f64, deletion: f64) -> Self {
        debug_assert!(substitution >= 0.0 && deletion >= 0.0 && substitution + deletion < 1.0);
        Self { matched: 1.0 - substitution - deletion, substitution: substitution / 3.0, deletion, insertion: 0.0 }
    }

    pub fn from_chemistry(_chemistry: &str) -> Self {
        Self::default()
    }

    /// False for chemistries the profile was never fit on; callers may
    /// want to warn before proceeding with the default rates.
    pub fn is_profiled(chemistry: &str) -> bool {
        !UNPROFILED.contains(&chemistry)
    }

    /// Probability of observing codon `to` given the true codon `from`:
    /// per-symbol product of match/deletion/substitution rates. Zero for
    /// length mismatches.
    pub fn codon_probability(&self, from: &[u8], to: &[u8]) -> f64 {
        if from.len() != to.len() {
            return 0.0;
        }
        let mut prob = 1.0;
        for (a, b) in from.iter().zip(to) {
            prob *= if a == b {
                self.matched
            } else if *a == b'-' || *b == b'-' {
                self.deletion
            } else {
                self.substitution
            };
        }
        prob
    }

    /// Estimate (substitution, deletion) rates from pileup columns with
    /// coverage above `min_coverage`. None when no column qualifies.
    pub fn estimate(columns: &ColumnPileup, min_coverage: u32) -> Option<(f64, f64)> {
        let mut sub = 0.0;
        let mut del = 0.0;
        let mut counted = 0usize;

        for column in columns.columns() {
            if column.coverage() > min_coverage {
                let gap = column.frequency(Nuc::Gap);
                let (argmax, _) = column.counts().mostfreq();
                del += gap;
                sub += 1.0 - gap - column.frequency(argmax);
                counted += 1;
            }
        }

        if counted > 0 {
            Some((sub / counted as f64, del / counted as f64))
        } else {
            None
        }
    }
}
