use serde::Serialize;

use crate::engine::correlation::CorrelationMatrix;
use crate::engine::distribution::{CategoricalSummary, NumericDistribution};
use crate::engine::outliers::{ColumnOutliers, OutlierSample};
use crate::engine::profile::{ColumnKind, ColumnProfile};
use crate::engine::quality::{DuplicateReport, Missingness, SheetOverview, TabularQuality};

/// Every analysis of one sheet, as produced by [`crate::Analyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    /// Sheet or file name, if the caller supplied one.
    pub name: Option<String>,
    pub overview: SheetOverview,
    pub profiles: Vec<ColumnProfile>,
    pub missingness: Missingness,
    pub quality: TabularQuality,
    pub duplicates: DuplicateReport,
    pub outliers: Vec<ColumnOutliers>,
    pub outlier_samples: Vec<OutlierSample>,
    pub correlation: CorrelationMatrix,
    pub distributions: Vec<NumericDistribution>,
    pub categories: Vec<CategoricalSummary>,
}

impl SheetReport {
    /// Names of the columns profiled as `kind`.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.profiles
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Total number of IQR outliers across all columns.
    pub fn total_iqr_outliers(&self) -> usize {
        self.outliers.iter().map(|o| o.count_iqr).sum()
    }
}
