use crate::error::{LensError, Result};

/// Default number of histogram bins.
pub const DEFAULT_BIN_COUNT: usize = 20;
/// Default number of categories reported by `top_categories`.
pub const DEFAULT_TOP_N: usize = 10;
/// Default Z-score above which a value is an outlier.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;
/// Default share a column needs to be classified as numeric or date.
pub const DEFAULT_KIND_THRESHOLD: f64 = 0.95;
/// Default number of outlier example rows collected per sheet.
pub const DEFAULT_OUTLIER_SAMPLE_LIMIT: usize = 10;

/// Date format preference for ambiguous date parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePreference {
    /// Day-Month-Year format (e.g., 31/12/2023).
    DmyFormat,
    /// Month-Day-Year format (e.g., 12/31/2023).
    #[default]
    MdyFormat,
}

impl DatePreference {
    /// Returns true if day comes before month in ambiguous dates.
    pub fn is_dmy(&self) -> bool {
        matches!(self, DatePreference::DmyFormat)
    }
}

/// Tunables shared by the analysis functions.
///
/// The free functions in [`crate::engine`] use [`AnalysisOptions::default`];
/// [`crate::Analyzer`] lets callers override individual values.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Number of histogram bins.
    pub bin_count: usize,
    /// Number of top categories per text column.
    pub top_n: usize,
    /// Z-score threshold for outlier counting.
    pub z_threshold: f64,
    /// Share above which a column is classified as numeric (or date).
    pub kind_threshold: f64,
    /// How ambiguous `aa/bb/yyyy` dates are read.
    pub date_preference: DatePreference,
    /// Maximum number of outlier example rows per sheet.
    pub outlier_sample_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            top_n: DEFAULT_TOP_N,
            z_threshold: DEFAULT_Z_THRESHOLD,
            kind_threshold: DEFAULT_KIND_THRESHOLD,
            date_preference: DatePreference::MdyFormat,
            outlier_sample_limit: DEFAULT_OUTLIER_SAMPLE_LIMIT,
        }
    }
}

impl AnalysisOptions {
    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.bin_count == 0 {
            return Err(LensError::InvalidConfig(
                "bin count must be at least 1".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(LensError::InvalidConfig(
                "top-N must be at least 1".to_string(),
            ));
        }
        if !self.z_threshold.is_finite() || self.z_threshold < 0.0 {
            return Err(LensError::InvalidConfig(format!(
                "Z-score threshold must be a non-negative number, got {}",
                self.z_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.kind_threshold) {
            return Err(LensError::InvalidConfig(format!(
                "kind threshold must lie in [0, 1], got {}",
                self.kind_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnalysisOptions::default().validate().is_ok());
        assert!(!DatePreference::default().is_dmy());
    }

    #[test]
    fn test_rejects_bad_values() {
        let opts = AnalysisOptions {
            bin_count: 0,
            ..AnalysisOptions::default()
        };
        assert!(matches!(opts.validate(), Err(LensError::InvalidConfig(_))));

        let opts = AnalysisOptions {
            z_threshold: f64::NAN,
            ..AnalysisOptions::default()
        };
        assert!(opts.validate().is_err());

        let opts = AnalysisOptions {
            kind_threshold: 1.5,
            ..AnalysisOptions::default()
        };
        assert!(opts.validate().is_err());
    }
}
