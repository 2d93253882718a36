use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::models::Column;

/// Pairwise Pearson correlation matrix over numeric columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major `n × n` coefficients; `NaN` where undefined
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Compute correlations using pairwise-complete observations.
    pub fn compute(columns: &[&Column]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];

        for i in 0..n {
            for j in i..n {
                let r = pearson(columns[i], columns[j], i == j);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            columns: columns.iter().map(|c| c.name.clone()).collect(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

fn pearson(a: &Column, b: &Column, same: bool) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .values
        .iter()
        .zip(&b.values)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx == 0.0 || sy == 0.0 || sx.is_nan() || sy.is_nan() {
        return f64::NAN;
    }
    if same {
        return 1.0;
    }

    let cov = xs.iter().covariance(ys.iter());
    (cov / (sx * sy)).clamp(-1.0, 1.0)
}
