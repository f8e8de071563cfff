use bigdecimal::ToPrimitive;
use chrono::NaiveDate;

use crate::models::{ImpactScores, PriceRecord};

/// Days of volume history the volume-impact baseline averages over.
pub const VOLUME_BASELINE_WINDOW: usize = 20;

/// Significance statistics for an event on `event_date`, computed from the
/// instrument's price history. All four scores are fractions; a score whose
/// inputs are missing (event outside the history, not enough forward days,
/// zero baseline) is 0.
///
/// The event is attributed to the first trading day on or after its calendar
/// date, so weekend news lands on the following session.
pub fn impact_scores(records: &[PriceRecord], event_date: NaiveDate) -> ImpactScores {
    let Some(day) = records.iter().position(|r| r.date >= event_date) else {
        return ImpactScores::default();
    };

    ImpactScores {
        roc1d: forward_return(records, day, 1),
        roc5d: forward_return(records, day, 5),
        stock_impact: day_over_day_return(records, day),
        volume_impact: volume_vs_baseline(records, day),
    }
}

fn close_f64(record: &PriceRecord) -> f64 {
    record.close.to_f64().unwrap_or(0.0)
}

/// close(day+horizon) / close(day) - 1
fn forward_return(records: &[PriceRecord], day: usize, horizon: usize) -> f64 {
    let base = close_f64(&records[day]);
    match records.get(day + horizon) {
        Some(forward) if base != 0.0 => close_f64(forward) / base - 1.0,
        _ => 0.0,
    }
}

/// close(day) / close(day-1) - 1
fn day_over_day_return(records: &[PriceRecord], day: usize) -> f64 {
    if day == 0 {
        return 0.0;
    }
    let prev = close_f64(&records[day - 1]);
    if prev == 0.0 {
        return 0.0;
    }
    close_f64(&records[day]) / prev - 1.0
}

/// volume(day) relative to the average volume of the preceding window.
fn volume_vs_baseline(records: &[PriceRecord], day: usize) -> f64 {
    if day == 0 {
        return 0.0;
    }
    let window_start = day.saturating_sub(VOLUME_BASELINE_WINDOW);
    let baseline_days = &records[window_start..day];
    let total: i64 = baseline_days.iter().map(|r| r.volume).sum();
    if total <= 0 {
        return 0.0;
    }
    let average = total as f64 / baseline_days.len() as f64;
    records[day].volume as f64 / average - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn record(day: u32, close: &str, volume: i64) -> PriceRecord {
        let close = BigDecimal::from_str(close).unwrap();
        PriceRecord {
            id: Uuid::new_v4(),
            stock_issue_code: "7203".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close.clone(),
            high: close.clone(),
            low: close.clone(),
            close,
            volume,
            turnover: None,
            sma1d: None,
            sma5w: None,
            sma13w: None,
            sma26w: None,
            created_at: Utc::now(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_scores_for_mid_history_event() {
        let records = vec![
            record(1, "100", 1000),
            record(2, "110", 2000),
            record(3, "99", 1000),
            record(4, "121", 1000),
        ];

        let scores = impact_scores(&records, date(2));

        assert!((scores.stock_impact - 0.10).abs() < 1e-9);
        // Baseline is the single preceding day (volume 1000).
        assert!((scores.volume_impact - 1.0).abs() < 1e-9);
        assert!((scores.roc1d - (-0.10)).abs() < 1e-9);
        // Only 2 forward days exist, so the 5-day return is 0.
        assert_eq!(scores.roc5d, 0.0);
    }

    #[test]
    fn test_event_before_history_attributes_to_first_day() {
        let records = vec![record(10, "100", 1000), record(11, "105", 1000)];

        let scores = impact_scores(&records, date(1));

        // First trading day has no previous close or volume baseline.
        assert_eq!(scores.stock_impact, 0.0);
        assert_eq!(scores.volume_impact, 0.0);
        assert!((scores.roc1d - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_event_after_history_is_all_zero() {
        let records = vec![record(1, "100", 1000)];
        let scores = impact_scores(&records, date(20));

        assert_eq!(scores.roc1d, 0.0);
        assert_eq!(scores.roc5d, 0.0);
        assert_eq!(scores.stock_impact, 0.0);
        assert_eq!(scores.volume_impact, 0.0);
    }

    #[test]
    fn test_weekend_event_lands_on_next_session() {
        // Trading days 5 and 8; an event dated 6 attributes to day 8.
        let records = vec![record(5, "100", 1000), record(8, "120", 3000)];

        let scores = impact_scores(&records, date(6));

        assert!((scores.stock_impact - 0.20).abs() < 1e-9);
        assert!((scores.volume_impact - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history() {
        let scores = impact_scores(&[], date(1));
        assert_eq!(scores.volume_impact, 0.0);
    }
}
