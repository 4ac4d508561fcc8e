//! Weighted uniform-bin histograms with shape normalization.

use sc_core::{Error, Result};

use crate::fields::BinRule;

/// A filled one-dimensional histogram with uniform bins.
#[derive(Debug, Clone)]
pub struct Histogram1D {
    /// Bin edges, length `n_bins + 1`.
    pub bin_edges: Vec<f64>,
    /// Bin contents (sum of weights per bin).
    pub y: Vec<f64>,
    /// Entries filled (rows, not weight).
    pub entries: u64,
}

impl Histogram1D {
    /// Empty histogram with `n_bins` uniform bins over `[lo, hi]`.
    pub fn uniform(n_bins: usize, lo: f64, hi: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::Validation("histogram requires at least one bin".into()));
        }
        if !(hi > lo) {
            return Err(Error::Validation(format!(
                "invalid histogram range: expected lo < hi, got ({lo}, {hi})"
            )));
        }
        let width = (hi - lo) / n_bins as f64;
        let mut edges = Vec::with_capacity(n_bins + 1);
        for k in 0..n_bins {
            edges.push(lo + k as f64 * width);
        }
        edges.push(hi);
        Ok(Self { bin_edges: edges, y: vec![0.0; n_bins], entries: 0 })
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.y.len()
    }

    /// Add each row's weight to the bin containing its value.
    ///
    /// Bins are lower-inclusive (`edges[k] <= v < edges[k+1]`); values at or
    /// beyond the range bounds fold into the first/last bin, so a value
    /// exactly equal to the upper bound is never dropped. `weights` of `None`
    /// fills with unit weights.
    pub fn fill(&mut self, values: &[f64], weights: Option<&[f64]>) -> Result<()> {
        if let Some(w) = weights {
            if w.len() != values.len() {
                return Err(Error::Validation(format!(
                    "weight length mismatch: expected {}, got {}",
                    values.len(),
                    w.len()
                )));
            }
        }

        let lo = self.bin_edges[0];
        let hi = *self.bin_edges.last().unwrap();
        let n = self.n_bins();
        let inv_width = n as f64 / (hi - lo);

        for (i, &v) in values.iter().enumerate() {
            let w = weights.map_or(1.0, |ws| ws[i]);
            let bin = if v <= lo {
                0
            } else if v >= hi {
                n - 1
            } else {
                (((v - lo) * inv_width) as usize).min(n - 1)
            };
            self.y[bin] += w;
            self.entries += 1;
        }
        Ok(())
    }

    /// Sum of bin contents.
    pub fn total(&self) -> f64 {
        self.y.iter().sum()
    }

    /// Divide every bin by the total so contents sum to 1.0.
    ///
    /// A zero total leaves all bins at zero instead of producing NaNs.
    pub fn normalized(mut self) -> Self {
        let total = self.total();
        if total != 0.0 {
            for y in &mut self.y {
                *y /= total;
            }
        }
        self
    }
}

/// Shared histogram range over two value columns.
///
/// The lower bound is clamped to include zero; a non-positive width (all
/// values equal and non-positive, or empty input) is widened to `[lo, lo+1]`
/// so histogram construction is always defined.
pub fn shared_range(a: &[f64], b: &[f64]) -> (f64, f64) {
    let mut lo = 0.0_f64;
    let mut hi = f64::NEG_INFINITY;
    for &v in a.iter().chain(b) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !hi.is_finite() || hi <= lo {
        return (lo, lo + 1.0);
    }
    (lo, hi)
}

/// Bin count for one sample's column under the given rule.
pub fn bin_count(rule: BinRule, values: &[f64], default_bins: usize) -> usize {
    match rule {
        BinRule::Default => default_bins.max(1),
        BinRule::IntegerPerSample => {
            let max = values.iter().fold(0.0_f64, |m, &v| m.max(v));
            (max as usize).max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform_edges() {
        let h = Histogram1D::uniform(3, 0.0, 300.0).unwrap();
        assert_eq!(h.bin_edges, vec![0.0, 100.0, 200.0, 300.0]);
        assert_eq!(h.n_bins(), 3);
    }

    #[test]
    fn invalid_range_rejected() {
        assert!(Histogram1D::uniform(3, 1.0, 1.0).is_err());
        assert!(Histogram1D::uniform(0, 0.0, 1.0).is_err());
    }

    #[test]
    fn weighted_fill_and_normalize() {
        // Background mass [50, 150, 250], weights [1, 2, 1] over [0, 300] / 3 bins.
        let mut h = Histogram1D::uniform(3, 0.0, 300.0).unwrap();
        h.fill(&[50.0, 150.0, 250.0], Some(&[1.0, 2.0, 1.0])).unwrap();
        assert_eq!(h.y, vec![1.0, 2.0, 1.0]);
        assert_relative_eq!(h.total(), 4.0);

        let n = h.normalized();
        assert_eq!(n.y, vec![0.25, 0.5, 0.25]);
        assert_relative_eq!(n.y.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn signal_normalizes_independently() {
        // Signal mass [200, 300], weights [1, 1] over the same range.
        let mut h = Histogram1D::uniform(3, 0.0, 300.0).unwrap();
        h.fill(&[200.0, 300.0], Some(&[1.0, 1.0])).unwrap();
        // 300 == upper bound -> last bin, together with 200.
        assert_eq!(h.y, vec![0.0, 0.0, 2.0]);
        let n = h.normalized();
        assert_eq!(n.y, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn upper_bound_value_lands_in_last_bin() {
        let mut h = Histogram1D::uniform(4, 0.0, 4.0).unwrap();
        h.fill(&[4.0], None).unwrap();
        assert_eq!(h.y, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn lower_inclusive_binning() {
        let mut h = Histogram1D::uniform(2, 0.0, 2.0).unwrap();
        h.fill(&[0.0, 1.0], None).unwrap();
        // Each edge value belongs to the bin it opens.
        assert_eq!(h.y, vec![1.0, 1.0]);
    }

    #[test]
    fn out_of_range_folds_into_end_bins() {
        let mut h = Histogram1D::uniform(2, 0.0, 2.0).unwrap();
        h.fill(&[-5.0, 7.0], None).unwrap();
        assert_eq!(h.y, vec![1.0, 1.0]);
    }

    #[test]
    fn unweighted_fill_counts_rows() {
        let mut h = Histogram1D::uniform(2, 0.0, 2.0).unwrap();
        h.fill(&[0.5, 0.6, 1.5], None).unwrap();
        assert_eq!(h.y, vec![2.0, 1.0]);
        assert_eq!(h.entries, 3);
    }

    #[test]
    fn negative_weights_pass_through() {
        let mut h = Histogram1D::uniform(1, 0.0, 1.0).unwrap();
        h.fill(&[0.5, 0.5], Some(&[1.0, -0.25])).unwrap();
        assert_relative_eq!(h.total(), 0.75);
    }

    #[test]
    fn zero_total_normalizes_to_zeros() {
        let h = Histogram1D::uniform(3, 0.0, 1.0).unwrap().normalized();
        assert_eq!(h.y, vec![0.0, 0.0, 0.0]);
        assert!(h.y.iter().all(|y| y.is_finite()));
    }

    #[test]
    fn shared_range_includes_zero() {
        // All positive values: lower bound clamps to 0.
        assert_eq!(shared_range(&[5.0, 10.0], &[7.0]), (0.0, 10.0));
        // Negative values push the lower bound down.
        assert_eq!(shared_range(&[-2.0, 3.0], &[1.0]), (-2.0, 3.0));
    }

    #[test]
    fn shared_range_degenerate_widened() {
        assert_eq!(shared_range(&[0.0, 0.0], &[0.0]), (0.0, 1.0));
        assert_eq!(shared_range(&[], &[]), (0.0, 1.0));
        assert_eq!(shared_range(&[-3.0], &[-3.0]), (-3.0, -2.0));
    }

    #[test]
    fn integer_bin_count_per_sample() {
        // Jet counts: background max 3, signal max 2.
        assert_eq!(bin_count(BinRule::IntegerPerSample, &[0.0, 1.0, 2.0, 3.0, 3.0], 40), 3);
        assert_eq!(bin_count(BinRule::IntegerPerSample, &[1.0, 2.0, 2.0], 40), 2);
        // Floor of 1 for empty or all-zero columns.
        assert_eq!(bin_count(BinRule::IntegerPerSample, &[], 40), 1);
        assert_eq!(bin_count(BinRule::IntegerPerSample, &[0.0], 40), 1);
        assert_eq!(bin_count(BinRule::Default, &[1.0], 40), 40);
    }

    #[test]
    fn jet_count_scenario() {
        // Background [0,1,2,3,3] and signal [1,2,2] share the range [0,3];
        // bin counts are per-sample (3 and 2).
        let (lo, hi) = shared_range(&[0.0, 1.0, 2.0, 3.0, 3.0], &[1.0, 2.0, 2.0]);
        assert_eq!((lo, hi), (0.0, 3.0));

        let mut bg = Histogram1D::uniform(3, lo, hi).unwrap();
        bg.fill(&[0.0, 1.0, 2.0, 3.0, 3.0], None).unwrap();
        // Values 3 fold into the last bin rather than being dropped.
        assert_eq!(bg.y, vec![1.0, 1.0, 3.0]);

        let mut sig = Histogram1D::uniform(2, lo, hi).unwrap();
        sig.fill(&[1.0, 2.0, 2.0], None).unwrap();
        assert_eq!(sig.y, vec![1.0, 2.0]);
    }
}
