//! Pairwise Pearson correlation across numeric columns.

use serde::Serialize;
use tracing::debug;

use super::numeric::{coerce_numbers, corr};
use crate::table::Table;

/// A column needs more than this many numeric values to be correlated.
pub const MIN_CORRELATION_VALUES: usize = 4;

/// Symmetric correlation matrix labelled by column name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    /// `matrix[i][j]` correlates `names[i]` with `names[j]`.
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Number of columns on each axis.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no column qualified.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Correlation between two columns by name, if both are present.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.matrix[i][j])
    }
}

/// Correlate every pair of columns holding more than four numeric values.
///
/// Each column contributes its numeric values in row order with
/// non-numeric cells dropped, and pairs are compared over their common
/// prefix. Columns below the threshold are left out of both axes.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let (names, numbers): (Vec<String>, Vec<Vec<f64>>) = table
        .columns()
        .map(|(name, values)| (name.to_string(), coerce_numbers(values)))
        .filter(|(_, nums)| nums.len() > MIN_CORRELATION_VALUES)
        .unzip();
    debug!(columns = ?names, "correlating numeric columns");

    let n = names.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let c = corr(&numbers[i], &numbers[j]);
            matrix[i][j] = c;
            matrix[j][i] = c;
        }
    }

    CorrelationMatrix { names, matrix }
}
