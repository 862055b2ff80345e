//! IQR-fence and Z-score outlier detection.

use serde::Serialize;
use tracing::trace;

use super::numeric::{mean, percentile_sorted, sort_ascending, std, to_number};
use crate::options::DEFAULT_Z_THRESHOLD;
use crate::table::Table;

/// Columns with fewer finite values than this are not checked for outliers.
pub const MIN_OUTLIER_VALUES: usize = 5;

/// Tukey fence multiplier.
const IQR_MULTIPLIER: f64 = 1.5;

/// Interquartile range fence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IqrFence {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub low: f64,
    pub high: f64,
}

impl IqrFence {
    const EMPTY: Self = Self {
        q1: f64::NAN,
        q3: f64::NAN,
        iqr: f64::NAN,
        low: f64::NAN,
        high: f64::NAN,
    };

    /// True if `v` lies strictly outside `[low, high]`.
    #[inline]
    pub fn is_outside(&self, v: f64) -> bool {
        v < self.low || v > self.high
    }

    /// True if both fences are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }
}

/// Compute the `q1 - 1.5 iqr .. q3 + 1.5 iqr` fence over the finite values.
///
/// All fields are NaN when there is no finite value.
pub fn iqr_fence(values: &[f64]) -> IqrFence {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return IqrFence::EMPTY;
    }
    sort_ascending(&mut v);
    let q1 = percentile_sorted(&v, 0.25);
    let q3 = percentile_sorted(&v, 0.75);
    let iqr = q3 - q1;
    IqrFence {
        q1,
        q3,
        iqr,
        low: q1 - IQR_MULTIPLIER * iqr,
        high: q3 + IQR_MULTIPLIER * iqr,
    }
}

/// Values whose absolute Z-score exceeds a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZScoreOutliers {
    pub count: usize,
    /// Positions within the finite subset of the input.
    pub indices: Vec<usize>,
}

/// Find values with `|x - mean| / std > z` among the finite values.
///
/// Reports nothing when the standard deviation is zero or not finite.
pub fn zscore_outliers(values: &[f64], z: f64) -> ZScoreOutliers {
    let v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    let m = mean(&v);
    let s = std(&v);
    if v.is_empty() || !s.is_finite() || s == 0.0 {
        return ZScoreOutliers {
            count: 0,
            indices: Vec::new(),
        };
    }
    let indices: Vec<usize> = v
        .iter()
        .enumerate()
        .filter(|&(_, &x)| ((x - m) / s).abs() > z)
        .map(|(i, _)| i)
        .collect();
    ZScoreOutliers {
        count: indices.len(),
        indices,
    }
}

/// Outlier summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutliers {
    pub name: String,
    /// False when the column had fewer than [`MIN_OUTLIER_VALUES`] finite values.
    pub numeric: bool,
    pub count_iqr: usize,
    pub count_z: usize,
    pub low: f64,
    pub high: f64,
}

/// IQR and Z-score outlier counts for every column, Z threshold 3.
pub fn detect_outliers_by_column(table: &Table) -> Vec<ColumnOutliers> {
    detect_outliers_by_column_with(table, DEFAULT_Z_THRESHOLD)
}

/// IQR and Z-score outlier counts for every column.
pub fn detect_outliers_by_column_with(table: &Table, z: f64) -> Vec<ColumnOutliers> {
    table
        .columns()
        .map(|(name, values)| {
            let numbers: Vec<f64> = values.map(to_number).filter(|x| x.is_finite()).collect();
            if numbers.len() < MIN_OUTLIER_VALUES {
                trace!(column = name, finite = numbers.len(), "too few values for outliers");
                return ColumnOutliers {
                    name: name.to_string(),
                    numeric: false,
                    count_iqr: 0,
                    count_z: 0,
                    low: f64::NAN,
                    high: f64::NAN,
                };
            }
            let fence = iqr_fence(&numbers);
            let count_iqr = numbers.iter().filter(|&&v| fence.is_outside(v)).count();
            ColumnOutliers {
                name: name.to_string(),
                numeric: true,
                count_iqr,
                count_z: zscore_outliers(&numbers, z).count,
                low: fence.low,
                high: fence.high,
            }
        })
        .collect()
}

/// One example row holding an IQR outlier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierSample {
    pub column: String,
    /// Zero-based data row index.
    pub row_index: usize,
    pub value: f64,
}

/// Collect up to `limit` example rows whose value lies outside its column fence.
///
/// Columns are visited in order and rows in order within a column.
pub fn outlier_samples(table: &Table, limit: usize) -> Vec<OutlierSample> {
    outlier_samples_from(table, &detect_outliers_by_column(table), limit)
}

/// Same as [`outlier_samples`] reusing already computed column summaries.
pub fn outlier_samples_from(
    table: &Table,
    outliers: &[ColumnOutliers],
    limit: usize,
) -> Vec<OutlierSample> {
    let mut samples = Vec::new();
    for (col, info) in outliers.iter().enumerate() {
        if samples.len() >= limit {
            break;
        }
        if !info.numeric || !info.low.is_finite() || !info.high.is_finite() {
            continue;
        }
        for (row_index, cell) in table.column(col).enumerate() {
            if samples.len() >= limit {
                break;
            }
            let v = to_number(cell);
            if !v.is_nan() && (v < info.low || v > info.high) {
                samples.push(OutlierSample {
                    column: info.name.clone(),
                    row_index,
                    value: v,
                });
            }
        }
    }
    samples
}
