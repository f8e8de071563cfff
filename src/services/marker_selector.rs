use std::cmp::Ordering;

use crate::models::{ChartMarker, DerivedSeries, NewsItem, ZoomWindow};
use crate::utils::to_display_date;

/// At most this many markers are pinned onto the chart at once.
pub const MAX_MARKERS: usize = 30;

/// Pick the news items to annotate the chart with: items inside the zoom
/// window, ranked by volume impact, capped at `MAX_MARKERS`. Each marker sits
/// on the primary series at its item's date; items whose date has no series
/// point are dropped.
pub fn select_markers(
    items: &[NewsItem],
    zoom: ZoomWindow,
    primary: &DerivedSeries,
) -> Vec<ChartMarker> {
    let mut within_window: Vec<&NewsItem> = items
        .iter()
        .filter(|item| zoom.contains_day(item.timestamp.date_naive()))
        .collect();

    within_window.sort_by(|a, b| {
        b.status
            .volume_impact
            .partial_cmp(&a.status.volume_impact)
            .unwrap_or(Ordering::Equal)
    });

    within_window
        .into_iter()
        .take(MAX_MARKERS)
        .filter_map(|item| {
            let date = to_display_date(item.timestamp.date_naive());
            let point = primary.point_at_date(&date)?;
            let value = point.close.clone()?;

            Some(ChartMarker {
                id: item.id,
                date,
                value,
                category: item.category,
                color: item.category.marker_color(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DerivedSeriesPoint, ImpactScores, NewsCategory};
    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn item(day: u32, volume_impact: f64) -> NewsItem {
        NewsItem {
            id: Uuid::new_v4(),
            category: NewsCategory::News,
            type_code: "news_nikkei".to_string(),
            stock_issue_code: "7203".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
            description: format!("item {}", day),
            source_ref: None,
            status: ImpactScores {
                volume_impact,
                ..ImpactScores::default()
            },
        }
    }

    fn series(days: &[u32]) -> DerivedSeries {
        DerivedSeries {
            stock_issue_code: "7203".to_string(),
            points: days
                .iter()
                .map(|&d| DerivedSeriesPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, d)
                        .unwrap()
                        .format("%Y/%m/%d")
                        .to_string(),
                    close: Some(BigDecimal::from(100 + d as i32)),
                    volume: 1000,
                    turnover: None,
                    sma1d: None,
                    sma5w: None,
                    sma13w: None,
                    sma26w: None,
                })
                .collect(),
        }
    }

    fn window(start_day: u32, end_day: u32) -> ZoomWindow {
        ZoomWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, start_day).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, end_day).unwrap(),
        )
    }

    #[test]
    fn test_caps_at_thirty_markers() {
        // 40 items with distinct impact scores, all on chartable days.
        let items: Vec<NewsItem> = (0..40u32).map(|i| item(1 + (i % 28), i as f64)).collect();
        let primary = series(&(1..=28).collect::<Vec<u32>>());

        let markers = select_markers(&items, window(1, 28), &primary);
        assert_eq!(markers.len(), MAX_MARKERS);
    }

    #[test]
    fn test_keeps_exactly_the_highest_impact_items() {
        let items: Vec<NewsItem> = (0..40u32).map(|i| item(1 + (i % 28), i as f64)).collect();
        let primary = series(&(1..=28).collect::<Vec<u32>>());

        let markers = select_markers(&items, window(1, 28), &primary);

        let kept: std::collections::HashSet<Uuid> = markers.iter().map(|m| m.id).collect();
        let mut expected: Vec<&NewsItem> = items.iter().collect();
        expected.sort_by(|a, b| {
            b.status
                .volume_impact
                .partial_cmp(&a.status.volume_impact)
                .unwrap()
        });
        for top in &expected[..30] {
            assert!(kept.contains(&top.id));
        }
        for rest in &expected[30..] {
            assert!(!kept.contains(&rest.id));
        }
    }

    #[test]
    fn test_window_filter_is_inclusive() {
        let items = vec![item(1, 1.0), item(5, 2.0), item(10, 3.0)];
        let primary = series(&[1, 5, 10]);

        let markers = select_markers(&items, window(1, 5), &primary);

        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| m.date <= "2024/01/05".to_string()));
    }

    #[test]
    fn test_item_without_series_point_is_dropped() {
        let items = vec![item(3, 5.0), item(4, 1.0)];
        // No point for day 3.
        let primary = series(&[1, 2, 4]);

        let markers = select_markers(&items, window(1, 5), &primary);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].date, "2024/01/04");
    }

    #[test]
    fn test_marker_value_is_series_close_at_date() {
        let items = vec![item(2, 1.0)];
        let primary = series(&[1, 2, 3]);

        let markers = select_markers(&items, window(1, 3), &primary);

        assert_eq!(markers[0].value, BigDecimal::from(102));
        assert_eq!(markers[0].color, "#0091EA");
    }
}
