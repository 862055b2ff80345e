//! Histograms, category frequencies and string-shape statistics.

use foldhash::{HashMap, HashMapExt};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::numeric::{coerce_numbers, mean, percentile_sorted, sort_ascending, std, to_number};
use super::outliers::{IqrFence, iqr_fence};
use crate::cell::CellValue;
use crate::table::Table;

/// Columns need at least this many numeric values to get a histogram summary.
pub const MIN_DISTRIBUTION_VALUES: usize = 2;

/// Columns whose numeric share over all rows exceeds this are not categorical.
pub const CATEGORICAL_MAX_NUMERIC_SHARE: f64 = 0.5;

static DIGIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("Invalid digit pattern"));
static ALPHA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("Invalid alpha pattern"));
static SPECIAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s]").expect("Invalid special pattern"));

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Lower edge of every bin.
    pub bin_edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub min: f64,
    pub max: f64,
}

impl Histogram {
    /// Upper edge of bin `i` as drawn: the next lower edge, or `max` for the last bin.
    pub fn upper_edge(&self, i: usize) -> f64 {
        self.bin_edges.get(i + 1).copied().unwrap_or(self.max)
    }

    /// Number of values binned.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin the finite values into `bin_count` equal-width bins.
///
/// The bin width spans `max(max - min, 1)`, so a constant input fills one bin.
/// The last bin is closed, the others half-open. A `bin_count` of 0 is
/// treated as 1.
pub fn histogram(values: &[f64], bin_count: usize) -> Histogram {
    let arr: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if arr.is_empty() {
        return Histogram {
            bin_edges: Vec::new(),
            counts: Vec::new(),
            min: f64::NAN,
            max: f64::NAN,
        };
    }

    let bin_count = bin_count.max(1);
    let min = arr.iter().copied().fold(f64::INFINITY, f64::min);
    let max = arr.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min).max(1.0);
    let bins = bin_count as f64;

    let bin_edges = (0..bin_count)
        .map(|i| min + (i as f64 * width) / bins)
        .collect();
    let mut counts = vec![0; bin_count];
    for v in arr {
        let idx = (((v - min) / width) * bins).floor() as usize;
        counts[idx.min(bin_count - 1)] += 1;
    }

    Histogram {
        bin_edges,
        counts,
        min,
        max,
    }
}

/// One ranked category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// `count / non_null_count`.
    pub pct: f64,
}

/// Most frequent values of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategories {
    pub items: Vec<CategoryCount>,
    pub non_null_count: usize,
    /// Number of distinct string keys.
    pub unique_count: usize,
}

/// Rank non-missing values by frequency.
///
/// Values are grouped by their string form, so `1` and `"1"` share a key.
/// Ties keep first-seen order.
pub fn top_categories<'a, I>(values: I, top_n: usize) -> TopCategories
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut freq: Vec<(String, usize)> = Vec::new();
    let mut non_null_count = 0;

    for v in values.into_iter().filter(|v| !v.is_missing()) {
        non_null_count += 1;
        let key = v.to_string();
        match index.get(&key) {
            Some(&i) => freq[i].1 += 1,
            None => {
                index.insert(key.clone(), freq.len());
                freq.push((key, 1));
            }
        }
    }

    let unique_count = freq.len();
    // Stable sort keeps insertion order among equal counts.
    freq.sort_by(|a, b| b.1.cmp(&a.1));
    let items = freq
        .into_iter()
        .take(top_n)
        .map(|(value, count)| CategoryCount {
            value,
            count,
            pct: if non_null_count == 0 {
                0.0
            } else {
                count as f64 / non_null_count as f64
            },
        })
        .collect();

    TopCategories {
        items,
        non_null_count,
        unique_count,
    }
}

/// Length and character-class statistics of stringified values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringStats {
    pub count: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub mean_len: f64,
    /// Share of values containing an ASCII digit.
    pub pct_digits: f64,
    /// Share of values containing an ASCII letter.
    pub pct_alpha: f64,
    /// Share of values containing something other than ASCII alphanumerics or whitespace.
    pub pct_special: f64,
}

/// Summarize the non-missing values as strings. Lengths count characters.
pub fn string_stats<'a, I>(values: I) -> StringStats
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let strings: Vec<String> = values
        .into_iter()
        .filter(|v| !v.is_missing())
        .map(ToString::to_string)
        .collect();
    let count = strings.len();
    let lens: Vec<usize> = strings.iter().map(|s| s.chars().count()).collect();
    let share = |re: &Regex| {
        if count == 0 {
            0.0
        } else {
            strings.iter().filter(|s| re.is_match(s)).count() as f64 / count as f64
        }
    };

    StringStats {
        count,
        min_len: lens.iter().copied().min().unwrap_or(0),
        max_len: lens.iter().copied().max().unwrap_or(0),
        mean_len: if count == 0 {
            0.0
        } else {
            lens.iter().sum::<usize>() as f64 / count as f64
        },
        pct_digits: share(&DIGIT_PATTERN),
        pct_alpha: share(&ALPHA_PATTERN),
        pct_special: share(&SPECIAL_PATTERN),
    }
}

/// Histogram and spread summary of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericDistribution {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    pub std: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub histogram: Histogram,
    pub fence: IqrFence,
    pub iqr_outliers: usize,
}

/// Summaries for every column with at least [`MIN_DISTRIBUTION_VALUES`] numbers.
pub fn numeric_distributions(table: &Table, bin_count: usize) -> Vec<NumericDistribution> {
    table
        .columns()
        .filter_map(|(name, values)| {
            let numbers = coerce_numbers(values);
            if numbers.len() < MIN_DISTRIBUTION_VALUES {
                return None;
            }
            let mut sorted = numbers.clone();
            sort_ascending(&mut sorted);
            let fence = iqr_fence(&sorted);
            Some(NumericDistribution {
                name: name.to_string(),
                n: numbers.len(),
                mean: mean(&numbers),
                std: std(&numbers),
                p25: percentile_sorted(&sorted, 0.25),
                median: percentile_sorted(&sorted, 0.5),
                p75: percentile_sorted(&sorted, 0.75),
                histogram: histogram(&numbers, bin_count),
                iqr_outliers: numbers.iter().filter(|&&v| fence.is_outside(v)).count(),
                fence,
            })
        })
        .collect()
}

/// Frequency and string summary of a mostly non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub name: String,
    pub top: TopCategories,
    pub strings: StringStats,
}

/// Summaries for columns whose numeric share over all rows is at most one half.
///
/// Columns with no non-missing value are skipped.
pub fn categorical_summaries(table: &Table, top_n: usize) -> Vec<CategoricalSummary> {
    table
        .columns()
        .filter_map(|(name, values)| {
            let values: Vec<&CellValue> = values.collect();
            let numeric = values.iter().filter(|v| to_number(v).is_finite()).count();
            let share = numeric as f64 / values.len().max(1) as f64;
            if share > CATEGORICAL_MAX_NUMERIC_SHARE {
                return None;
            }
            let top = top_categories(values.iter().copied(), top_n);
            if top.items.is_empty() {
                return None;
            }
            Some(CategoricalSummary {
                name: name.to_string(),
                top,
                strings: string_stats(values.iter().copied()),
            })
        })
        .collect()
}
