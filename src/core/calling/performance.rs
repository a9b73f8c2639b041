use serde::ser::{Serialize, SerializeMap, Serializer};

/// Validation tallies against the configured expected minors.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PerformanceMetrics {
    tests: usize,
    expected_minors: usize,
    true_positives: u32,
    false_positives: u32,
    true_negatives: u32,
    false_negatives: u32,
}

impl PerformanceMetrics {
    pub fn new(tests: usize, expected_minors: usize) -> Self {
        Self {
            tests,
            expected_minors,
            true_positives: 0,
            false_positives: 0,
            true_negatives: 0,
            false_negatives: 0,
        }
    }

    /// Tally one tested codon. Non-variable sites only count when they are
    /// predictors, otherwise the dominant call would flood the negatives.
    pub fn record(&mut self, predictor: bool, variable: bool, significant: bool) {
        if variable {
            match (predictor, significant) {
                (true, true) => self.true_positives += 1,
                (true, false) => self.false_negatives += 1,
                (false, true) => self.false_positives += 1,
                (false, false) => self.true_negatives += 1,
            }
        } else if predictor {
            if significant {
                self.true_positives += 1;
            } else {
                self.false_negatives += 1;
            }
        }
    }

    #[inline]
    pub fn tests(&self) -> usize {
        self.tests
    }

    #[inline]
    pub fn expected_minors(&self) -> usize {
        self.expected_minors
    }

    #[inline]
    pub fn true_positives(&self) -> u32 {
        self.true_positives
    }

    #[inline]
    pub fn false_positives(&self) -> u32 {
        self.false_positives
    }

    #[inline]
    pub fn true_negatives(&self) -> u32 {
        self.true_negatives
    }

    #[inline]
    pub fn false_negatives(&self) -> u32 {
        self.false_negatives
    }

    pub fn true_positive_rate(&self) -> f64 {
        if self.expected_minors == 0 {
            return 0.0;
        }
        f64::from(self.true_positives) / self.expected_minors as f64
    }

    pub fn false_positive_rate(&self) -> f64 {
        let negatives = self.tests.saturating_sub(self.expected_minors);
        if negatives == 0 {
            return 0.0;
        }
        f64::from(self.false_positives) / negatives as f64
    }

    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            return 0.0;
        }
        f64::from(self.true_positives + self.true_negatives) / f64::from(total)
    }
}

impl Serialize for PerformanceMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("true_positive_rate", &self.true_positive_rate())?;
        map.serialize_entry("false_positive_rate", &self.false_positive_rate())?;
        map.serialize_entry("num_tests", &self.tests)?;
        map.serialize_entry("num_false_positives", &self.false_positives)?;
        map.serialize_entry("accuracy", &self.accuracy())?;
        map.end()
    }
}

impl std::fmt::Display for PerformanceMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TPR {:.4}, FPR {:.4}, accuracy {:.4} ({} tests, {} false positives)",
            self.true_positive_rate(),
            self.false_positive_rate(),
            self.accuracy(),
            self.tests,
            self.false_positives
        )
    }
}
