//! Delimited-text table source.
//!
//! Loads CSV/TSV input into a [`Table`]: the first record is the header row,
//! every other field becomes a `Text` cell and is left for the engine to
//! coerce.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cell::CellValue;
use crate::encoding::decode_text;
use crate::error::{LensError, Result};
use crate::table::Table;

/// Pick a delimiter from a file extension: tab for `.tsv`/`.tab`, comma otherwise.
pub fn delimiter_for_path(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("tsv" | "tab") => b'\t',
        _ => b',',
    }
}

impl Table {
    /// Parse delimited bytes into a table.
    ///
    /// Empty header cells are named `col_<n>` (1-based). Trailing blank rows
    /// are dropped. Rows keep their own length, so ragged input stays ragged.
    pub fn from_csv_bytes(data: &[u8], delimiter: u8) -> Result<Table> {
        let (text, info) = decode_text(data);
        debug!(encoding = info.encoding, bom = info.had_bom, "decoded input");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => record?,
            None => return Err(LensError::EmptyData),
        };

        let headers: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if h.is_empty() {
                    format!("col_{}", i + 1)
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(record.iter().map(CellValue::from).collect::<Vec<_>>());
        }

        let mut table = Table::new(headers, rows);
        table.trim_trailing_blank_rows();
        debug!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "loaded delimited table"
        );
        Ok(table)
    }

    /// Read and parse a delimited file, choosing the delimiter from its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Table> {
        let path = path.as_ref();
        Self::from_path_with_delimiter(path, delimiter_for_path(path))
    }

    /// Read and parse a delimited file with an explicit delimiter.
    pub fn from_path_with_delimiter<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Table> {
        let data = fs::read(path.as_ref())?;
        if data.is_empty() {
            return Err(LensError::EmptyData);
        }
        Self::from_csv_bytes(&data, delimiter)
    }
}
