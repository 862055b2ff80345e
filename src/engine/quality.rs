//! Missingness, row-shape uniformity, duplicate rows and candidate keys.

use foldhash::{HashSet, HashSetExt};
use serde::Serialize;
use std::fmt::Write;

use super::numeric::{mean, std};
use crate::cell::{CellValue, format_number};
use crate::table::Table;

/// Missing-value rate of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissingness {
    pub name: String,
    /// `missing / surviving rows`, 0 when no rows survive.
    pub rate: f64,
    pub missing: usize,
}

/// Missing-value accounting over the non-blank rows of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Missingness {
    pub by_column: Vec<ColumnMissingness>,
    /// Missing cells over all surviving header-aligned cells.
    pub overall: f64,
    /// Rows holding at least one non-missing value.
    pub surviving_rows: usize,
}

/// Compute per-column and overall missing rates.
///
/// Rows in which every entry is missing are dropped first and do not count
/// towards any denominator.
pub fn missingness(table: &Table) -> Missingness {
    let valid: Vec<&Vec<CellValue>> = table
        .rows
        .iter()
        .filter(|r| r.iter().any(|v| !v.is_missing()))
        .collect();
    let surviving_rows = valid.len();

    let by_column: Vec<ColumnMissingness> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let missing = valid
                .iter()
                .filter(|r| r.get(i).is_none_or(CellValue::is_missing))
                .count();
            ColumnMissingness {
                name: name.clone(),
                rate: ratio(missing, surviving_rows),
                missing,
            }
        })
        .collect();

    let total_missing: usize = by_column.iter().map(|c| c.missing).sum();
    let overall = ratio(total_missing, surviving_rows * table.num_columns());

    Missingness {
        by_column,
        overall,
        surviving_rows,
    }
}

/// Row-length statistics on the raw, header-independent rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TabularQuality {
    pub avg_row_len: f64,
    pub stdev_row_len: f64,
    /// `1 - stdev / avg`; 1 when the average is 0.
    pub uniformity: f64,
}

/// Measure how jagged the raw rows are.
pub fn tabular_quality(rows: &[Vec<CellValue>]) -> TabularQuality {
    let lens: Vec<f64> = rows.iter().map(|r| r.len() as f64).collect();
    let avg_row_len = mean(&lens);
    let stdev_row_len = std(&lens);
    let uniformity = if avg_row_len == 0.0 {
        1.0
    } else {
        1.0 - stdev_row_len / avg_row_len
    };
    TabularQuality {
        avg_row_len,
        stdev_row_len,
        uniformity,
    }
}

/// A column whose non-missing values are all distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateKey {
    pub index: usize,
    pub name: String,
}

/// Duplicate-row count and candidate key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    /// Rows identical to an earlier row.
    pub dup_row_count: usize,
    /// Total number of rows inspected.
    pub total: usize,
    pub candidates: Vec<CandidateKey>,
}

/// Count repeated rows and find candidate key columns.
///
/// Rows compare by full positional content including cell type, so the
/// number `1` and the text `"1"` differ.
pub fn duplicates_and_keys(table: &Table) -> DuplicateReport {
    let mut seen: HashSet<String> = HashSet::with_capacity(table.num_rows());
    let mut dup_row_count = 0;
    for row in &table.rows {
        if !seen.insert(row_signature(row)) {
            dup_row_count += 1;
        }
    }

    let candidates = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| is_candidate_key(table, *i))
        .map(|(index, name)| CandidateKey {
            index,
            name: name.clone(),
        })
        .collect();

    DuplicateReport {
        dup_row_count,
        total: table.num_rows(),
        candidates,
    }
}

fn is_candidate_key(table: &Table, col: usize) -> bool {
    let mut seen = HashSet::new();
    let mut non_missing = 0;
    for key in table.column(col).filter_map(CellValue::key) {
        non_missing += 1;
        if !seen.insert(key) {
            return false;
        }
    }
    non_missing > 0
}

/// Type-tagged serialization of a row used as its identity.
fn row_signature(row: &[CellValue]) -> String {
    struct Num(f64);
    impl std::fmt::Display for Num {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            format_number(self.0, f)
        }
    }

    let mut sig = String::with_capacity(row.len() * 8);
    for cell in row {
        // Writing into a String cannot fail.
        let _ = match cell {
            CellValue::Null => write!(sig, "z;"),
            CellValue::Number(n) => write!(sig, "n{};", Num(*n)),
            CellValue::Text(s) => write!(sig, "s{}:{s};", s.len()),
            CellValue::Date(d) => write!(sig, "d{};", d.and_utc().timestamp_micros()),
        };
    }
    sig
}

/// Shape and fill of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetOverview {
    pub row_count: usize,
    pub column_count: usize,
    /// `row_count * column_count`.
    pub cell_count: usize,
    /// Non-missing cells within the header-aligned grid.
    pub non_null_cells: usize,
    /// `None` when the sheet has no cells.
    pub non_null_rate: Option<f64>,
}

/// Count cells and non-missing cells over the header-aligned grid.
pub fn sheet_overview(table: &Table) -> SheetOverview {
    let column_count = table.num_columns();
    let cell_count = table.num_rows() * column_count;
    let non_null_cells = table
        .rows
        .iter()
        .map(|r| r.iter().take(column_count).filter(|v| !v.is_missing()).count())
        .sum();
    SheetOverview {
        row_count: table.num_rows(),
        column_count,
        cell_count,
        non_null_cells,
        non_null_rate: (cell_count > 0).then(|| non_null_cells as f64 / cell_count as f64),
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
