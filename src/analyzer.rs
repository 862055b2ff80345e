//! Analyzer builder that runs every report over a table.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::engine::correlation::correlation_matrix;
use crate::engine::distribution::{categorical_summaries, numeric_distributions};
use crate::engine::outliers::{detect_outliers_by_column_with, outlier_samples_from};
use crate::engine::profile::profile_columns_with;
use crate::engine::quality::{duplicates_and_keys, missingness, sheet_overview, tabular_quality};
use crate::error::Result;
use crate::options::{AnalysisOptions, DatePreference};
use crate::report::SheetReport;
use crate::table::Table;

/// Configurable front end to the analysis engine.
///
/// # Example
///
/// ```
/// use sheet_lens::{Analyzer, Table};
///
/// let table = Table::from_csv_bytes(b"id,score\n1,9.5\n2,7.25\n3,8\n", b',').unwrap();
///
/// let mut analyzer = Analyzer::new();
/// analyzer.bin_count(10).top_n(5);
///
/// let report = analyzer.analyze(&table).unwrap();
/// assert_eq!(report.profiles.len(), 2);
/// assert_eq!(report.duplicates.candidates.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    /// Create an Analyzer with default settings.
    pub fn new() -> Self {
        Self {
            options: AnalysisOptions::default(),
        }
    }

    /// Create an Analyzer from a full set of options.
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Current options.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Set the number of histogram bins.
    pub fn bin_count(&mut self, bin_count: usize) -> &mut Self {
        self.options.bin_count = bin_count;
        self
    }

    /// Set how many top categories are kept per text column.
    pub fn top_n(&mut self, top_n: usize) -> &mut Self {
        self.options.top_n = top_n;
        self
    }

    /// Set the Z-score outlier threshold.
    pub fn z_threshold(&mut self, z: f64) -> &mut Self {
        self.options.z_threshold = z;
        self
    }

    /// Set the share a column needs to be classified numeric or date.
    pub fn kind_threshold(&mut self, threshold: f64) -> &mut Self {
        self.options.kind_threshold = threshold;
        self
    }

    /// Set the date preference for ambiguous date parsing.
    pub fn date_preference(&mut self, date_preference: DatePreference) -> &mut Self {
        self.options.date_preference = date_preference;
        self
    }

    /// Set the maximum number of outlier example rows.
    pub fn outlier_sample_limit(&mut self, limit: usize) -> &mut Self {
        self.options.outlier_sample_limit = limit;
        self
    }

    /// Validate the configured options.
    pub fn validate(&self) -> Result<()> {
        self.options.validate()
    }

    /// Run every analysis over `table`.
    #[instrument(skip_all, fields(rows = table.num_rows(), columns = table.num_columns()))]
    pub fn analyze(&self, table: &Table) -> Result<SheetReport> {
        self.validate()?;
        Ok(self.build_report(None, table))
    }

    /// Run every analysis over `table`, labelling the report with `name`.
    pub fn analyze_named(&self, name: &str, table: &Table) -> Result<SheetReport> {
        self.validate()?;
        Ok(self.build_report(Some(name.to_string()), table))
    }

    /// Analyze several named sheets in parallel, preserving input order.
    pub fn analyze_sheets(&self, sheets: &[(String, Table)]) -> Result<Vec<SheetReport>> {
        self.validate()?;
        Ok(sheets
            .par_iter()
            .map(|(name, table)| self.build_report(Some(name.clone()), table))
            .collect())
    }

    /// Load a delimited file and analyze it.
    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<SheetReport> {
        self.validate()?;
        let path = path.as_ref();
        let table = Table::from_path(path)?;
        Ok(self.build_report(Some(path.display().to_string()), &table))
    }

    fn build_report(&self, name: Option<String>, table: &Table) -> SheetReport {
        let opts = &self.options;
        let outliers = detect_outliers_by_column_with(table, opts.z_threshold);
        let outlier_samples = outlier_samples_from(table, &outliers, opts.outlier_sample_limit);
        let report = SheetReport {
            name,
            overview: sheet_overview(table),
            profiles: profile_columns_with(table, opts),
            missingness: missingness(table),
            quality: tabular_quality(&table.rows),
            duplicates: duplicates_and_keys(table),
            outliers,
            outlier_samples,
            correlation: correlation_matrix(table),
            distributions: numeric_distributions(table, opts.bin_count),
            categories: categorical_summaries(table, opts.top_n),
        };
        debug!(
            name = report.name.as_deref().unwrap_or("<unnamed>"),
            duplicates = report.duplicates.dup_row_count,
            iqr_outliers = report.total_iqr_outliers(),
            "sheet analyzed"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::engine::profile::ColumnKind;
    use crate::error::LensError;

    #[test]
    fn test_analyzer_builder() {
        let mut analyzer = Analyzer::new();
        analyzer
            .bin_count(40)
            .top_n(3)
            .z_threshold(2.5)
            .date_preference(DatePreference::DmyFormat)
            .outlier_sample_limit(2);

        let opts = analyzer.options();
        assert_eq!(opts.bin_count, 40);
        assert_eq!(opts.top_n, 3);
        assert_eq!(opts.z_threshold, 2.5);
        assert_eq!(opts.date_preference, DatePreference::DmyFormat);
        assert_eq!(opts.outlier_sample_limit, 2);
    }

    #[test]
    fn test_invalid_config() {
        let mut analyzer = Analyzer::new();
        analyzer.bin_count(0);
        let result = analyzer.analyze(&Table::default());
        assert!(matches!(result, Err(LensError::InvalidConfig(_))));
    }

    #[test]
    fn test_analyze() {
        let table = Table::from_csv_bytes(
            b"id,city,score\n1,Oslo,3.5\n2,Rome,4\n3,Oslo,2\n4,Lima,5\n5,Oslo,1\n",
            b',',
        )
        .unwrap();
        let mut analyzer = Analyzer::new();
        analyzer.bin_count(4);
        let report = analyzer.analyze(&table).unwrap();

        assert_eq!(report.columns_of_kind(ColumnKind::Number), vec!["id", "score"]);
        assert_eq!(report.correlation.names, vec!["id", "score"]);
        assert_eq!(report.distributions[0].histogram.counts.len(), 4);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].top.items[0].value, "Oslo");
        assert_eq!(report.overview.non_null_rate, Some(1.0));
        assert_eq!(report.duplicates.candidates.len(), 2);
    }

    #[test]
    fn test_day_first_dates_classified() {
        let rows = ["13/01/2020", "14/02/2020", "15/03/2020"]
            .iter()
            .map(|s| vec![CellValue::from(*s)])
            .collect();
        let table = Table::from_rows(["when"], rows);
        let mut analyzer = Analyzer::new();
        analyzer.date_preference(DatePreference::DmyFormat);
        let report = analyzer.analyze(&table).unwrap();
        assert_eq!(report.profiles[0].kind, ColumnKind::Date);
    }

    #[test]
    fn test_kind_threshold_setter() {
        let mut rows: Vec<Vec<CellValue>> =
            (1..=19i32).map(|i| vec![CellValue::from(i)]).collect();
        rows.push(vec!["x".into()]);
        let table = Table::from_rows(["n"], rows);

        let report = Analyzer::new().analyze(&table).unwrap();
        assert_eq!(report.profiles[0].kind, ColumnKind::Text);

        let mut analyzer = Analyzer::new();
        analyzer.kind_threshold(0.9);
        assert_eq!(analyzer.options().kind_threshold, 0.9);
        let report = analyzer.analyze(&table).unwrap();
        assert_eq!(report.profiles[0].kind, ColumnKind::Number);
        assert_eq!(report.profiles[0].stats.as_ref().unwrap().count, 19);
    }

    #[test]
    fn test_analyze_sheets_keeps_order() {
        let sheets: Vec<(String, Table)> = (0..5)
            .map(|i| {
                (
                    format!("sheet{i}"),
                    Table::from_rows(["v"], vec![vec![i.into()]]),
                )
            })
            .collect();
        let reports = Analyzer::new().analyze_sheets(&sheets).unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["sheet0", "sheet1", "sheet2", "sheet3", "sheet4"]);
    }
}
