use serde::{Deserialize, Serialize};

use crate::models::Column;

/// Linear-interpolated quantile of already sorted values. `NaN` when empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Equal-width histogram of one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Source column name
    pub column: String,
    /// `bins + 1` ascending bin edges; empty when the column has no values
    pub edges: Vec<f64>,
    /// Count per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the non-null values of a column.
    pub fn from_column(column: &Column, bins: usize) -> Self {
        Self::from_values(&column.name, &column.numeric_values(), bins)
    }

    /// Bin values into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// The last bin is closed on the right. A zero-width range is widened to
    /// `[v - 0.5, v + 0.5]`.
    pub fn from_values(column: &str, values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Histogram {
                column: column.to_string(),
                edges: Vec::new(),
                counts: vec![0; bins],
            };
        }

        let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram {
            column: column.to_string(),
            edges,
            counts,
        }
    }

    /// `(lower, upper, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, count)| (edge[0], edge[1], *count))
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        Some((*self.edges.first()?, *self.edges.last()?))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Five-number summary plus Tukey whiskers for a boxplot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxStats {
    pub column: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    /// Values outside the whiskers
    pub outliers: Vec<f64>,
    /// Sorted finite values the summary was computed from
    #[serde(skip)]
    pub values: Vec<f64>,
}

impl BoxStats {
    pub fn from_column(column: &Column) -> Option<Self> {
        Self::from_values(&column.name, &column.numeric_values())
    }

    /// `None` when there are no finite values.
    pub fn from_values(column: &str, values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let sorted = sorted_copy(&finite);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lower_whisker || *v > upper_whisker)
            .collect();

        Some(BoxStats {
            column: column.to_string(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
            values: sorted,
        })
    }
}

/// Rows and columns of a subplot grid for `n` panels.
///
/// 1 → 1×1, 2 → 1×2, 3 and 4 → 2×2, otherwise the smallest `k` with
/// `k * k >= n` gives `k × (k - 1)` when that fits, else `k × k`.
pub fn grid_layout(n: usize) -> (usize, usize) {
    match n {
        0 | 1 => (1, 1),
        2 => (1, 2),
        3 | 4 => (2, 2),
        _ => {
            let mut k = 1;
            while k * k < n {
                k += 1;
            }
            if (k - 1) * k >= n {
                (k, k - 1)
            } else {
                (k, k)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_quantile_linear() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_approx_eq!(quantile(&sorted, 0.25), 2.0);
        assert_approx_eq!(quantile(&sorted, 0.5), 3.0);
        assert_approx_eq!(quantile(&sorted, 0.75), 4.0);
        let even = vec![1.0, 2.0, 3.0, 4.0];
        assert_approx_eq!(quantile(&even, 0.5), 2.5);
        assert_approx_eq!(quantile(&even, 0.25), 1.75);
    }

    #[test]
    fn test_quantile_empty_is_nan() {
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_histogram_counts_all_values() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let hist = Histogram::from_values("x", &values, 30);
        assert_eq!(hist.counts.len(), 30);
        assert_eq!(hist.edges.len(), 31);
        assert_eq!(hist.total(), 100);
        assert_eq!(hist.range(), Some((0.0, 99.0)));
    }

    #[test]
    fn test_histogram_max_goes_to_last_bin() {
        let hist = Histogram::from_values("x", &[0.0, 10.0], 10);
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[9], 1);
    }

    #[test]
    fn test_histogram_constant_values() {
        let hist = Histogram::from_values("x", &[4.0, 4.0, 4.0], 30);
        assert_eq!(hist.range(), Some((3.5, 4.5)));
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_histogram_empty() {
        let hist = Histogram::from_values("x", &[], 30);
        assert!(hist.range().is_none());
        assert_eq!(hist.bins().count(), 0);
        assert_eq!(hist.max_count(), 0);
    }

    #[test]
    fn test_box_stats_with_outlier() {
        let stats = BoxStats::from_values("x", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_approx_eq!(stats.median, 3.5);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_approx_eq!(stats.upper_whisker, 5.0);
        assert_approx_eq!(stats.lower_whisker, 1.0);
        assert_approx_eq!(stats.max, 100.0);
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(BoxStats::from_values("x", &[]).is_none());
    }

    #[test]
    fn test_grid_layout() {
        assert_eq!(grid_layout(1), (1, 1));
        assert_eq!(grid_layout(2), (1, 2));
        assert_eq!(grid_layout(3), (2, 2));
        assert_eq!(grid_layout(5), (3, 2));
        assert_eq!(grid_layout(7), (3, 3));
        assert_eq!(grid_layout(12), (4, 3));
        assert_eq!(grid_layout(13), (4, 4));
    }
}
