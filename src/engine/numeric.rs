//! Numeric kernel shared by the per-report modules.
//!
//! Every function here is total: empty input produces a documented fallback
//! (0 for means, NaN for percentiles and correlations) instead of panicking.

use foldhash::{HashSet, HashSetExt};

use crate::cell::CellValue;

/// Arithmetic mean. Empty input yields 0.
pub fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len().max(1) as f64
}

/// Sample variance (divisor `n - 1`, clamped to 1 for `n <= 1`).
pub fn variance(xs: &[f64]) -> f64 {
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|&x| (x - m) * (x - m)).sum();
    ss / xs.len().saturating_sub(1).max(1) as f64
}

/// Sample standard deviation.
#[inline]
pub fn std(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Percentile `p` (0..=1) by linear interpolation between closest ranks.
///
/// Returns NaN for empty input.
pub fn percentile(xs: &[f64], p: f64) -> f64 {
    let mut sorted = xs.to_vec();
    sort_ascending(&mut sorted);
    percentile_sorted(&sorted, p)
}

/// Same as [`percentile`] for input that is already sorted ascending.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let last = (sorted.len() - 1) as f64;
    // NaN `p` falls through clamp unchanged; treat it as the lower bound.
    let idx = if p.is_nan() { 0.0 } else { (last * p).clamp(0.0, last) };
    let lo = idx.floor();
    let hi = idx.ceil();
    let t = idx - lo;
    sorted[lo as usize] * (1.0 - t) + sorted[hi as usize] * t
}

/// Sort ascending using IEEE total order so NaNs cannot break the sort.
pub(crate) fn sort_ascending(xs: &mut [f64]) {
    xs.sort_by(f64::total_cmp);
}

/// Pearson correlation over the common prefix of `a` and `b`.
///
/// Returns NaN when the prefix is empty or either side has zero variance.
pub fn corr(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return f64::NAN;
    }
    let (a, b) = (&a[..n], &b[..n]);
    // A rounded mean can leave tiny non-zero deviations on constant input.
    if is_constant(a) || is_constant(b) {
        return f64::NAN;
    }
    let ma = mean(a);
    let mb = mean(b);

    let mut num = 0.0;
    let mut da = 0.0;
    let mut db = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let x = x - ma;
        let y = y - mb;
        num += x * y;
        da += x * x;
        db += y * y;
    }

    if da == 0.0 || db == 0.0 {
        f64::NAN
    } else {
        num / (da * db).sqrt()
    }
}

fn is_constant(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[0] == w[1])
}

/// Coerce a cell to a number.
///
/// Numbers pass through unchanged. Text is trimmed and must parse in full as
/// a finite decimal literal. Everything else, including dates, is NaN.
pub fn to_number(v: &CellValue) -> f64 {
    match v {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_number(s).unwrap_or(f64::NAN),
        CellValue::Null | CellValue::Date(_) => f64::NAN,
    }
}

/// Parse trimmed text as a finite number.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    // f64::from_str also accepts "inf" and "NaN" spellings; only finite
    // results count as numeric.
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce every value and keep the finite results, preserving order.
///
/// `Number` cells holding an infinity are dropped here even though
/// [`to_number`] passes them through.
pub fn coerce_numbers<'a, I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    values
        .into_iter()
        .map(to_number)
        .filter(|x| x.is_finite())
        .collect()
}

/// Number of distinct values, ignoring `Null` and the empty string.
pub fn unique_count<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut seen = HashSet::new();
    for key in values.into_iter().filter_map(CellValue::key) {
        seen.insert(key);
    }
    seen.len()
}
