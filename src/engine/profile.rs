//! Per-column kind inference and summary statistics.

use serde::Serialize;
use std::fmt;

use super::dates::is_date_like;
use super::numeric::{coerce_numbers, mean, percentile_sorted, sort_ascending, std, unique_count};
use crate::cell::CellValue;
use crate::options::AnalysisOptions;
use crate::table::Table;

/// Inferred column kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// More than the threshold share of non-missing values are numeric.
    Number,
    /// More than the threshold share of non-missing values are dates.
    Date,
    /// Fallback kind.
    #[default]
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Number => write!(f, "number"),
            ColumnKind::Date => write!(f, "date"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// Summary statistics over the numeric values of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl NumericStats {
    /// Compute stats over `values`. Returns `None` for empty input.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sort_ascending(&mut sorted);
        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted),
            std: std(&sorted),
            min: sorted[0],
            p25: percentile_sorted(&sorted, 0.25),
            p50: percentile_sorted(&sorted, 0.5),
            p75: percentile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Number of rows, including missing cells.
    pub row_count: usize,
    pub non_null_count: usize,
    /// `1 - non_null_count / row_count`.
    pub empty_rate: f64,
    pub unique_count: usize,
    /// Share of non-missing values that coerce to a number.
    pub numeric_share: f64,
    /// Share of non-missing values that are dates or date-like text.
    pub date_share: f64,
    /// Present only for `ColumnKind::Number`.
    pub stats: Option<NumericStats>,
}

/// Profile every column with default options.
pub fn profile_columns(table: &Table) -> Vec<ColumnProfile> {
    profile_columns_with(table, &AnalysisOptions::default())
}

/// Profile every column.
pub fn profile_columns_with(table: &Table, options: &AnalysisOptions) -> Vec<ColumnProfile> {
    table
        .columns()
        .map(|(name, values)| {
            let values: Vec<&CellValue> = values.collect();
            profile_column(name, &values, options)
        })
        .collect()
}

/// Profile one column from its cell values.
pub fn profile_column(name: &str, values: &[&CellValue], options: &AnalysisOptions) -> ColumnProfile {
    let non_null: Vec<&CellValue> = values.iter().copied().filter(|v| !v.is_missing()).collect();
    let non_null_count = non_null.len();
    let empty_rate = 1.0 - non_null_count as f64 / values.len().max(1) as f64;

    let numbers = coerce_numbers(non_null.iter().copied());
    let dates = non_null
        .iter()
        .filter(|v| is_date_like(v, options.date_preference))
        .count();
    let (numeric_share, date_share) = if non_null_count == 0 {
        (0.0, 0.0)
    } else {
        (
            numbers.len() as f64 / non_null_count as f64,
            dates as f64 / non_null_count as f64,
        )
    };

    let kind = if numeric_share > options.kind_threshold {
        ColumnKind::Number
    } else if date_share > options.kind_threshold {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    };

    let stats = match kind {
        ColumnKind::Number => NumericStats::from_values(&numbers),
        ColumnKind::Date | ColumnKind::Text => None,
    };

    ColumnProfile {
        name: name.to_string(),
        kind,
        row_count: values.len(),
        non_null_count,
        empty_rate,
        unique_count: unique_count(non_null.iter().copied()),
        numeric_share,
        date_share,
        stats,
    }
}
