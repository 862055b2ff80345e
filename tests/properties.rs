//! Property tests for the numeric invariants of the engine.

use proptest::prelude::*;
use sheet_lens::{CellValue, corr, histogram, percentile, top_categories};

fn finite_vec(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6..1.0e6f64, 1..max_len)
}

proptest! {
    #[test]
    fn percentile_bounds(xs in finite_vec(64)) {
        let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(percentile(&xs, 0.0), min);
        prop_assert_eq!(percentile(&xs, 1.0), max);
    }

    #[test]
    fn percentile_is_monotone(xs in finite_vec(64), a in 0.0..=1.0f64, b in 0.0..=1.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(percentile(&xs, lo) <= percentile(&xs, hi) + 1e-9);
    }

    #[test]
    fn self_correlation_is_one(xs in finite_vec(32)) {
        let c = corr(&xs, &xs);
        let constant = xs.iter().all(|&x| x == xs[0]);
        if constant {
            prop_assert!(c.is_nan());
        } else {
            prop_assert!((c - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn histogram_conserves_counts(
        mut xs in finite_vec(128),
        bins in 1usize..50,
        extra_nan in 0usize..4,
    ) {
        let finite = xs.len();
        xs.extend(std::iter::repeat_n(f64::NAN, extra_nan));
        let h = histogram(&xs, bins);
        prop_assert_eq!(h.counts.len(), bins);
        prop_assert_eq!(h.bin_edges.len(), bins);
        prop_assert_eq!(h.total(), finite);
    }

    #[test]
    fn top_categories_sorted_and_bounded(
        words in prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", ""]), 0..60),
        top_n in 1usize..6,
    ) {
        let values: Vec<CellValue> = words.iter().map(|w| CellValue::from(*w)).collect();
        let top = top_categories(&values, top_n);
        let total: usize = top.items.iter().map(|c| c.count).sum();
        prop_assert!(total <= top.non_null_count);
        prop_assert!(top.items.len() <= top_n);
        for pair in top.items.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
            if pair[0].count == pair[1].count {
                let first = |v: &str| words.iter().position(|w| *w == v);
                prop_assert!(first(pair[0].value.as_str()) < first(pair[1].value.as_str()));
            }
        }
    }
}
