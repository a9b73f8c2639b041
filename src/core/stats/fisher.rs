use statrs::distribution::{Discrete, Hypergeometric};

/// Two-sided Fisher exact test for the 2x2 contingency table
/// [[n11, n12], [n21, n22]]: the sum of hypergeometric point masses not
/// exceeding the observed one, with fixed marginals.
pub fn fisher_exact(n11: u32, n12: u32, n21: u32, n22: u32) -> f64 {
    let (a, b, c, d) = (n11 as u64, n12 as u64, n21 as u64, n22 as u64);

    let total = a + b + c + d;
    if total == 0 {
        return 1.0;
    }

    let row1 = a + b;
    let col1 = a + c;
    // A zero/full marginal admits a single table
    if row1 == 0 || col1 == 0 || row1 == total || col1 == total {
        return 1.0;
    }

    let dist = match Hypergeometric::new(total, row1, col1) {
        Ok(dist) => dist,
        Err(_) => return 1.0,
    };

    let observed = dist.pmf(a);
    let min_a = (row1 + col1).saturating_sub(total);
    let max_a = row1.min(col1);

    let mut pvalue = 0.0;
    for k in min_a..=max_a {
        let p = dist.pmf(k);
        // Epsilon guards against float noise around equal tails
        if p <= observed + 1e-10 {
            pvalue += p;
        }
    }

    pvalue.min(1.0)
}
