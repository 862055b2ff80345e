//! In-memory table shape consumed by every analysis function.

use crate::cell::CellValue;

static MISSING: CellValue = CellValue::Null;

/// A header row plus positional data rows.
///
/// Rows may be shorter or longer than `headers`. Column `i` is `rows[*][i]`,
/// and reading past the end of a row yields [`CellValue::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names, not required to be unique.
    pub headers: Vec<String>,
    /// Data rows aligned to `headers` by index.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from anything convertible into headers and cells.
    ///
    /// ```
    /// use sheet_lens::Table;
    ///
    /// let table = Table::from_rows(["id", "name"], vec![vec![1.into(), "a".into()]]);
    /// assert_eq!(table.num_columns(), 2);
    /// ```
    pub fn from_rows<H, S>(headers: H, rows: Vec<Vec<CellValue>>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    /// Returns true if there are no data rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of data rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of header columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    /// Cell at `(row, col)`; out-of-range positions read as `Null`.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }

    /// Iterate the values of column `col`, one per row.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |r| r.get(col).unwrap_or(&MISSING))
    }

    /// Iterate `(name, values)` for every header column.
    pub fn columns(
        &self,
    ) -> impl Iterator<Item = (&str, impl Iterator<Item = &CellValue> + '_)> + '_ {
        self.headers
            .iter()
            .enumerate()
            .map(move |(i, name)| (name.as_str(), self.column(i)))
    }

    /// Raw positional length of each row, ignoring headers.
    pub fn row_lengths(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Drop trailing rows that hold no non-missing value.
    pub fn trim_trailing_blank_rows(&mut self) {
        while self
            .rows
            .last()
            .is_some_and(|r| r.iter().all(CellValue::is_missing))
        {
            self.rows.pop();
        }
    }
}
