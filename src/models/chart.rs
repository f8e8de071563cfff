use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::news_item::NewsCategory;
use crate::models::price_record::PriceRecord;

// ==============================================================================
// Zoom Window
// ==============================================================================

/// The visible date range of a chart. Every series/marker computation in one
/// request observes the same window value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ZoomWindow {
    /// Default span of the editor variant: the most recent 31 trading days.
    pub const EDITOR_DEFAULT_DAYS: usize = 31;

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Window covering the whole record run. None when there are no records.
    pub fn full_range(records: &[PriceRecord]) -> Option<Self> {
        let start = records.first()?.date;
        let end = records.last()?.date;
        Some(Self::new(start, end))
    }

    /// Window over the most recent `days` records (the editor default).
    pub fn recent(records: &[PriceRecord], days: usize) -> Option<Self> {
        let end = records.last()?.date;
        let start_idx = records.len().saturating_sub(days.max(1));
        let start = records[start_idx].date;
        Some(Self::new(start, end))
    }

    /// Calendar-day containment, inclusive on both ends.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

// ==============================================================================
// Series selection
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKey {
    Turnover,
    Sma1d,
    Sma5w,
    Sma13w,
    Sma26w,
}

impl IndicatorKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "turnover" => Some(IndicatorKey::Turnover),
            "sma1d" => Some(IndicatorKey::Sma1d),
            "sma5w" => Some(IndicatorKey::Sma5w),
            "sma13w" => Some(IndicatorKey::Sma13w),
            "sma26w" => Some(IndicatorKey::Sma26w),
            _ => None,
        }
    }
}

/// Which optional fields the caller toggled on. Close and volume are always
/// carried.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectedIndicators {
    pub turnover: bool,
    pub sma1d: bool,
    pub sma5w: bool,
    pub sma13w: bool,
    pub sma26w: bool,
}

impl SelectedIndicators {
    pub fn from_keys(keys: &[IndicatorKey]) -> Self {
        let mut selected = Self::default();
        for key in keys {
            match key {
                IndicatorKey::Turnover => selected.turnover = true,
                IndicatorKey::Sma1d => selected.sma1d = true,
                IndicatorKey::Sma5w => selected.sma5w = true,
                IndicatorKey::Sma13w => selected.sma13w = true,
                IndicatorKey::Sma26w => selected.sma26w = true,
            }
        }
        selected
    }

    pub fn all() -> Self {
        Self {
            turnover: true,
            sma1d: true,
            sma5w: true,
            sma13w: true,
            sma26w: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesMode {
    /// Raw values for a single instrument.
    Single,
    /// Cumulative percentage change rebased to the zoom-window anchor, so
    /// instruments with different price levels share one axis.
    Compare,
}

// ==============================================================================
// Derived output
// ==============================================================================

/// One output row per input trading day. Unselected fields serialize as
/// absent; in compare mode close and the moving averages hold rebased
/// percentages instead of prices.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedSeriesPoint {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<BigDecimal>,
    pub volume: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma1d: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma5w: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma13w: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma26w: Option<BigDecimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DerivedSeries {
    pub stock_issue_code: String,
    pub points: Vec<DerivedSeriesPoint>,
}

impl DerivedSeries {
    pub fn point_at_date(&self, date: &str) -> Option<&DerivedSeriesPoint> {
        self.points.iter().find(|p| p.date == date)
    }
}

// ==============================================================================
// Markers
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChartMarker {
    pub id: Uuid,
    pub date: String,
    pub value: BigDecimal,
    pub category: NewsCategory,
    pub color: &'static str,
}

// ==============================================================================
// Chart endpoint surface
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartVariant {
    /// Analytics view: zoom defaults to the full available range.
    #[default]
    Analytics,
    /// Graph editor: zoom defaults to the most recent 31 trading days.
    Editor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartParams {
    pub primary: String,
    /// Comma-joined comparison instrument codes.
    pub compares: Option<String>,
    /// Comma-joined indicator keys.
    pub indicators: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub variant: ChartVariant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub zoom: ZoomWindow,
    pub series: Vec<DerivedSeries>,
    pub markers: Vec<ChartMarker>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zoom_window_normalizes_reversed_bounds() {
        let w = ZoomWindow::new(date(2024, 3, 1), date(2024, 1, 1));
        assert_eq!(w.start, date(2024, 1, 1));
        assert_eq!(w.end, date(2024, 3, 1));
    }

    #[test]
    fn test_zoom_window_contains_is_inclusive() {
        let w = ZoomWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        assert!(w.contains_day(date(2024, 1, 1)));
        assert!(w.contains_day(date(2024, 1, 31)));
        assert!(!w.contains_day(date(2024, 2, 1)));
    }

    #[test]
    fn test_indicator_key_parse_rejects_unknown() {
        assert_eq!(IndicatorKey::parse("sma5w"), Some(IndicatorKey::Sma5w));
        assert_eq!(IndicatorKey::parse("macd"), None);
    }
}
