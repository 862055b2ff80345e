//! sheet-lens: descriptive statistics and data-quality signals for tables
//!
//! Turns a raw table (headers plus rows of loosely-typed cells) into column
//! profiles, missingness reports, outlier counts, correlation matrices,
//! histograms and category frequencies.
//!
//! # Quick Start
//!
//! ```
//! use sheet_lens::{Table, profile_columns, top_categories};
//!
//! let table = Table::from_rows(
//!     ["id", "colour"],
//!     vec![
//!         vec![1.into(), "red".into()],
//!         vec![2.into(), "blue".into()],
//!         vec![3.into(), "red".into()],
//!     ],
//! );
//!
//! let profiles = profile_columns(&table);
//! println!("{}: {}", profiles[0].name, profiles[0].kind);
//!
//! let top = top_categories(table.column(1), 1);
//! assert_eq!(top.items[0].value, "red");
//! ```
//!
//! # Analysis functions
//!
//! Every engine function takes the table explicitly and is total: empty or
//! degenerate input produces sentinel values (`0`, `NaN`, empty vectors)
//! rather than errors. Ragged rows are allowed; reading past the end of a
//! row yields a missing value.
//!
//! [`Analyzer`] bundles all of them into a single [`SheetReport`] and is
//! the place to change bin counts, thresholds and date parsing.

mod analyzer;
mod cell;
mod encoding;
pub mod engine;
mod error;
mod options;
mod report;
mod source;
mod table;

pub use analyzer::Analyzer;
pub use cell::CellValue;
pub use error::{LensError, Result};
pub use options::{AnalysisOptions, DatePreference};
pub use report::SheetReport;
pub use source::delimiter_for_path;
pub use table::Table;

// Flat re-exports of the engine.
pub use engine::correlation::{CorrelationMatrix, correlation_matrix};
pub use engine::dates::parse_date;
pub use engine::distribution::{
    CategoricalSummary, CategoryCount, Histogram, NumericDistribution, StringStats,
    TopCategories, categorical_summaries, histogram, numeric_distributions, string_stats,
    top_categories,
};
pub use engine::numeric::{corr, mean, percentile, std, to_number, unique_count, variance};
pub use engine::outliers::{
    ColumnOutliers, IqrFence, OutlierSample, ZScoreOutliers, detect_outliers_by_column,
    iqr_fence, outlier_samples, zscore_outliers,
};
pub use engine::profile::{ColumnKind, ColumnProfile, NumericStats, profile_columns};
pub use engine::quality::{
    CandidateKey, ColumnMissingness, DuplicateReport, Missingness, SheetOverview,
    TabularQuality, duplicates_and_keys, missingness, sheet_overview, tabular_quality,
};

// Re-export for advanced usage
pub use encoding::{DecodeInfo, decode_text, is_utf8};
