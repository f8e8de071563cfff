use bigdecimal::{BigDecimal, Zero};

use crate::models::{
    DerivedSeries, DerivedSeriesPoint, PriceRecord, SelectedIndicators, SeriesMode, ZoomWindow,
};
use crate::utils::to_display_date;

/// One instrument's ordered-by-date price run, as loaded for a chart request.
#[derive(Debug)]
pub struct SeriesSource<'a> {
    pub stock_issue_code: &'a str,
    pub records: &'a [PriceRecord],
}

/// Derive one chart series per instrument.
///
/// Single mode passes raw values through. Compare mode converts close and the
/// selected moving averages into cumulative percentage change and rebases each
/// series so the point at the zoom-window anchor reads as zero. Volume and
/// turnover are never rebased.
pub fn build_series(
    sources: &[SeriesSource<'_>],
    selected: SelectedIndicators,
    zoom: ZoomWindow,
    mode: SeriesMode,
) -> Vec<DerivedSeries> {
    sources
        .iter()
        .map(|source| match mode {
            SeriesMode::Single => build_single(source, selected),
            SeriesMode::Compare => build_compare(source, selected, zoom),
        })
        .collect()
}

fn build_single(source: &SeriesSource<'_>, selected: SelectedIndicators) -> DerivedSeries {
    let points = source
        .records
        .iter()
        .map(|r| DerivedSeriesPoint {
            date: to_display_date(r.date),
            close: Some(r.close.clone()),
            volume: r.volume,
            turnover: if selected.turnover { r.turnover.clone() } else { None },
            sma1d: if selected.sma1d { r.sma1d.clone() } else { None },
            sma5w: if selected.sma5w { r.sma5w.clone() } else { None },
            sma13w: if selected.sma13w { r.sma13w.clone() } else { None },
            sma26w: if selected.sma26w { r.sma26w.clone() } else { None },
        })
        .collect();

    DerivedSeries {
        stock_issue_code: source.stock_issue_code.to_string(),
        points,
    }
}

fn build_compare(
    source: &SeriesSource<'_>,
    selected: SelectedIndicators,
    zoom: ZoomWindow,
) -> DerivedSeries {
    let records = source.records;
    let anchor = anchor_index(records, zoom);

    let closes: Vec<Option<BigDecimal>> =
        records.iter().map(|r| Some(r.close.clone())).collect();
    let close_rebased = rebase(&closes, anchor);

    let sma1d_rebased = selected
        .sma1d
        .then(|| rebase(&collect_field(records, |r| r.sma1d.clone()), anchor));
    let sma5w_rebased = selected
        .sma5w
        .then(|| rebase(&collect_field(records, |r| r.sma5w.clone()), anchor));
    let sma13w_rebased = selected
        .sma13w
        .then(|| rebase(&collect_field(records, |r| r.sma13w.clone()), anchor));
    let sma26w_rebased = selected
        .sma26w
        .then(|| rebase(&collect_field(records, |r| r.sma26w.clone()), anchor));

    let points = records
        .iter()
        .enumerate()
        .map(|(i, r)| DerivedSeriesPoint {
            date: to_display_date(r.date),
            close: Some(close_rebased[i].clone()),
            volume: r.volume,
            turnover: if selected.turnover { r.turnover.clone() } else { None },
            sma1d: sma1d_rebased.as_ref().map(|v| v[i].clone()),
            sma5w: sma5w_rebased.as_ref().map(|v| v[i].clone()),
            sma13w: sma13w_rebased.as_ref().map(|v| v[i].clone()),
            sma26w: sma26w_rebased.as_ref().map(|v| v[i].clone()),
        })
        .collect();

    DerivedSeries {
        stock_issue_code: source.stock_issue_code.to_string(),
        points,
    }
}

fn collect_field<F>(records: &[PriceRecord], field: F) -> Vec<Option<BigDecimal>>
where
    F: Fn(&PriceRecord) -> Option<BigDecimal>,
{
    records.iter().map(field).collect()
}

/// Index of the first record whose date equals the zoom-window start
/// (calendar-day equality). Falls back to 0 when no record matches.
pub fn anchor_index(records: &[PriceRecord], zoom: ZoomWindow) -> usize {
    records
        .iter()
        .position(|r| r.date == zoom.start)
        .unwrap_or(0)
}

/// 1-period rate of change as a percentage, rounded to two decimal places.
/// The first row and any step with a missing or zero baseline contribute 0.
fn rate_of_change(values: &[Option<BigDecimal>]) -> Vec<BigDecimal> {
    let hundred = BigDecimal::from(100);
    let mut roc = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i == 0 {
            roc.push(BigDecimal::zero());
            continue;
        }
        let step = match (&values[i - 1], &values[i]) {
            (Some(prev), Some(curr)) if !prev.is_zero() => {
                ((curr - prev) / prev * &hundred).round(2)
            }
            _ => BigDecimal::zero(),
        };
        roc.push(step);
    }

    roc
}

/// Accumulate the ROC steps into a cumulative percentage series and shift it
/// so the anchor row reads as zero.
fn rebase(values: &[Option<BigDecimal>], anchor: usize) -> Vec<BigDecimal> {
    let roc = rate_of_change(values);

    let mut cumulative = Vec::with_capacity(roc.len());
    let mut running = BigDecimal::zero();
    for step in &roc {
        running += step;
        cumulative.push(running.clone());
    }

    let offset = cumulative
        .get(anchor)
        .cloned()
        .unwrap_or_else(BigDecimal::zero);

    cumulative.into_iter().map(|v| v - &offset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn record(day: u32, close: &str) -> PriceRecord {
        PriceRecord {
            id: Uuid::new_v4(),
            stock_issue_code: "7203".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: dec(close),
            high: dec(close),
            low: dec(close),
            close: dec(close),
            volume: 1000,
            turnover: Some(dec(close) * BigDecimal::from(1000)),
            sma1d: Some(dec(close)),
            sma5w: None,
            sma13w: None,
            sma26w: None,
            created_at: Utc::now(),
        }
    }

    fn window(start_day: u32, end_day: u32) -> ZoomWindow {
        ZoomWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, start_day).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, end_day).unwrap(),
        )
    }

    #[test]
    fn test_single_mode_preserves_length_and_order() {
        let records: Vec<PriceRecord> =
            [("1", 1u32), ("2", 2), ("3", 3)].iter().map(|&(c, d)| record(d, c)).collect();
        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];

        let out = build_series(
            &sources,
            SelectedIndicators::default(),
            window(1, 3),
            SeriesMode::Single,
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points.len(), records.len());
        let dates: Vec<&str> = out[0].points.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024/01/01", "2024/01/02", "2024/01/03"]);
    }

    #[test]
    fn test_single_mode_omits_unselected_indicators() {
        let records = vec![record(1, "100")];
        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];

        let out = build_series(
            &sources,
            SelectedIndicators::default(),
            window(1, 1),
            SeriesMode::Single,
        );

        assert!(out[0].points[0].sma1d.is_none());
        assert!(out[0].points[0].turnover.is_none());
        assert_eq!(out[0].points[0].close, Some(dec("100")));
    }

    #[test]
    fn test_empty_source_list_yields_empty_output() {
        let out = build_series(
            &[],
            SelectedIndicators::all(),
            window(1, 5),
            SeriesMode::Compare,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_compare_mode_anchor_reads_zero_for_every_selected_field() {
        let records: Vec<PriceRecord> = [(1u32, "100"), (2, "101"), (3, "99"), (4, "102"), (5, "103")]
            .iter()
            .map(|&(d, c)| record(d, c))
            .collect();
        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];

        let mut selected = SelectedIndicators::default();
        selected.sma1d = true;

        let out = build_series(&sources, selected, window(3, 5), SeriesMode::Compare);
        let anchor_point = &out[0].points[2];

        assert_eq!(anchor_point.close, Some(BigDecimal::from(0)));
        assert_eq!(anchor_point.sma1d, Some(BigDecimal::from(0)));
    }

    // Closes [100,101,99,102,103] with window start 2024-01-02: the rebased
    // close at the anchor is 0 and the next row equals the 1-period ROC of
    // 99 vs 101 (-1.98).
    #[test]
    fn test_compare_mode_concrete_scenario() {
        let records: Vec<PriceRecord> = [(1u32, "100"), (2, "101"), (3, "99"), (4, "102"), (5, "103")]
            .iter()
            .map(|&(d, c)| record(d, c))
            .collect();
        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];

        let out = build_series(
            &sources,
            SelectedIndicators::default(),
            window(2, 4),
            SeriesMode::Compare,
        );
        let points = &out[0].points;

        assert_eq!(points[1].close, Some(BigDecimal::from(0)));
        assert_eq!(points[1].date, "2024/01/02");
        assert_eq!(points[2].close, Some(dec("-1.98")));
    }

    #[test]
    fn test_rebasing_is_translation_invariant() {
        let records: Vec<PriceRecord> = [(1u32, "100"), (2, "101"), (3, "99"), (4, "102"), (5, "103")]
            .iter()
            .map(|&(d, c)| record(d, c))
            .collect();
        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];
        let selected = SelectedIndicators::default();

        let anchored_at_2 =
            build_series(&sources, selected, window(2, 5), SeriesMode::Compare);
        let anchored_at_4 =
            build_series(&sources, selected, window(4, 5), SeriesMode::Compare);

        // Shifting the anchor changes every value by one constant offset.
        let offset = anchored_at_2[0].points[0].close.clone().unwrap()
            - anchored_at_4[0].points[0].close.clone().unwrap();
        for (a, b) in anchored_at_2[0].points.iter().zip(anchored_at_4[0].points.iter()) {
            let diff = a.close.clone().unwrap() - b.close.clone().unwrap();
            assert_eq!(diff, offset);
        }
    }

    #[test]
    fn test_unmatched_window_start_anchors_at_first_record() {
        let records: Vec<PriceRecord> =
            [(2u32, "100"), (3, "110")].iter().map(|&(d, c)| record(d, c)).collect();

        // 2024-01-01 is not a trading day in this run.
        let zoom = window(1, 3);
        assert_eq!(anchor_index(&records, zoom), 0);

        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];
        let out = build_series(
            &sources,
            SelectedIndicators::default(),
            zoom,
            SeriesMode::Compare,
        );
        assert_eq!(out[0].points[0].close, Some(BigDecimal::from(0)));
        assert_eq!(out[0].points[1].close, Some(dec("10.00")));
    }

    #[test]
    fn test_missing_indicator_values_contribute_zero_steps() {
        let mut records: Vec<PriceRecord> =
            [(1u32, "100"), (2, "110"), (3, "121")].iter().map(|&(d, c)| record(d, c)).collect();
        records[1].sma1d = None;

        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];
        let mut selected = SelectedIndicators::default();
        selected.sma1d = true;

        let out = build_series(&sources, selected, window(1, 3), SeriesMode::Compare);

        // Steps into and out of the gap are zero; the series stays flat.
        assert_eq!(out[0].points[1].sma1d, Some(BigDecimal::from(0)));
        assert_eq!(out[0].points[2].sma1d, Some(BigDecimal::from(0)));
    }

    #[test]
    fn test_volume_passes_through_unrebased() {
        let records: Vec<PriceRecord> =
            [(1u32, "100"), (2, "110")].iter().map(|&(d, c)| record(d, c)).collect();
        let sources = [SeriesSource { stock_issue_code: "7203", records: &records }];

        let out = build_series(
            &sources,
            SelectedIndicators::all(),
            window(1, 2),
            SeriesMode::Compare,
        );

        assert_eq!(out[0].points[0].volume, 1000);
        assert_eq!(out[0].points[1].volume, 1000);
        assert_eq!(out[0].points[1].turnover, Some(dec("110") * BigDecimal::from(1000)));
    }
}
