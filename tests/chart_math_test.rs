/// Chart Derivation Accuracy Tests
///
/// Numeric invariants of the compare-mode rebasing pipeline and the marker
/// ranking rules, checked against hand-computed values.

// ---------------------------------------------------------------------------
// Rate-of-change / rebasing arithmetic
// ---------------------------------------------------------------------------

#[cfg(test)]
mod rebasing {
    /// 1-period ROC as a percentage, rounded to two decimals, leading 0.
    fn rate_of_change(values: &[f64]) -> Vec<f64> {
        let mut roc = vec![0.0];
        for pair in values.windows(2) {
            let step = if pair[0] == 0.0 {
                0.0
            } else {
                ((pair[1] - pair[0]) / pair[0] * 100.0 * 100.0).round() / 100.0
            };
            roc.push(step);
        }
        roc
    }

    fn cumulative(roc: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(roc.len());
        let mut running = 0.0;
        for step in roc {
            running += step;
            out.push((running * 100.0).round() / 100.0);
        }
        out
    }

    fn rebase(values: &[f64], anchor: usize) -> Vec<f64> {
        let cum = cumulative(&rate_of_change(values));
        let offset = cum[anchor];
        cum.iter().map(|v| ((v - offset) * 100.0).round() / 100.0).collect()
    }

    #[test]
    fn test_roc_of_reference_closes() {
        let roc = rate_of_change(&[100.0, 101.0, 99.0, 102.0, 103.0]);
        assert_eq!(roc, vec![0.0, 1.0, -1.98, 3.03, 0.98]);
    }

    #[test]
    fn test_anchor_value_is_zero() {
        let rebased = rebase(&[100.0, 101.0, 99.0, 102.0, 103.0], 1);
        assert_eq!(rebased[1], 0.0);
    }

    #[test]
    fn test_value_after_anchor_equals_single_step_roc() {
        // Anchored at index 1 (close 101), the next row must read as the
        // 1-period ROC of 99 vs 101.
        let rebased = rebase(&[100.0, 101.0, 99.0, 102.0, 103.0], 1);
        assert!((rebased[2] - (-1.98)).abs() < 1e-9);
    }

    #[test]
    fn test_rebasing_is_a_pure_translation() {
        let closes = [100.0, 101.0, 99.0, 102.0, 103.0];
        let a = rebase(&closes, 1);
        let b = rebase(&closes, 3);

        let offset = a[0] - b[0];
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y - offset).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flat_series_rebases_to_all_zero() {
        let rebased = rebase(&[50.0, 50.0, 50.0, 50.0], 2);
        assert!(rebased.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_zero_baseline_contributes_no_step() {
        let roc = rate_of_change(&[0.0, 100.0, 110.0]);
        assert_eq!(roc[1], 0.0);
        assert!((roc[2] - 10.0).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Marker ranking rules
// ---------------------------------------------------------------------------

#[cfg(test)]
mod marker_ranking {
    const MAX_MARKERS: usize = 30;

    fn top_by_impact(mut impacts: Vec<(u32, f64)>) -> Vec<(u32, f64)> {
        impacts.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        impacts.truncate(MAX_MARKERS);
        impacts
    }

    #[test]
    fn test_never_more_than_thirty() {
        let items: Vec<(u32, f64)> = (0..40).map(|i| (i, i as f64)).collect();
        assert_eq!(top_by_impact(items).len(), MAX_MARKERS);
    }

    #[test]
    fn test_exactly_the_top_thirty_survive() {
        // 40 distinct scores: the survivors are exactly scores 10..39.
        let items: Vec<(u32, f64)> = (0..40).map(|i| (i, i as f64)).collect();
        let kept = top_by_impact(items);

        assert!(kept.iter().all(|(_, impact)| *impact >= 10.0));
        assert_eq!(kept[0].1, 39.0);
        assert_eq!(kept.last().unwrap().1, 10.0);
    }

    #[test]
    fn test_order_is_descending() {
        let items: Vec<(u32, f64)> = (0..40).map(|i| (i, (i * 7 % 40) as f64)).collect();
        let kept = top_by_impact(items);
        for pair in kept.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_fewer_than_cap_passes_through() {
        let items: Vec<(u32, f64)> = (0..5).map(|i| (i, i as f64)).collect();
        assert_eq!(top_by_impact(items).len(), 5);
    }
}

// ---------------------------------------------------------------------------
// Derived indicator formulas
// ---------------------------------------------------------------------------

#[cfg(test)]
mod derived_stats {
    /// turnover = close * volume
    fn turnover(close: f64, volume: i64) -> f64 {
        close * volume as f64
    }

    /// volume impact = volume / baseline average - 1
    fn volume_impact(volume: i64, baseline: &[i64]) -> f64 {
        if baseline.is_empty() {
            return 0.0;
        }
        let avg = baseline.iter().sum::<i64>() as f64 / baseline.len() as f64;
        if avg == 0.0 {
            return 0.0;
        }
        volume as f64 / avg - 1.0
    }

    #[test]
    fn test_turnover() {
        assert_eq!(turnover(123.5, 1000), 123_500.0);
    }

    #[test]
    fn test_volume_impact_double_average() {
        let impact = volume_impact(2000, &[1000, 1000, 1000]);
        assert!((impact - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_impact_quiet_day_is_negative() {
        let impact = volume_impact(500, &[1000, 1000]);
        assert!(impact < 0.0);
    }

    #[test]
    fn test_volume_impact_empty_baseline() {
        assert_eq!(volume_impact(1000, &[]), 0.0);
    }
}
