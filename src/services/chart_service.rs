use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db::price_queries;
use crate::errors::AppError;
use crate::models::{
    ChartParams, ChartResponse, ChartVariant, IndicatorKey, PriceRecord, SelectedIndicators,
    SeriesMode, ZoomWindow,
};
use crate::services::series_builder::{self, SeriesSource};
use crate::services::{marker_selector, news_service};
use crate::utils::{is_valid_issue_code, split_codes};

/// Assemble one chart payload: a derived series per instrument, the marker
/// set for the primary, and the zoom window the computation observed.
pub async fn build_chart(
    pool: &PgPool,
    group_id: Uuid,
    params: &ChartParams,
) -> Result<ChartResponse, AppError> {
    let compares = split_codes(params.compares.as_deref());
    let indicators = parse_indicators(params.indicators.as_deref())?;

    for code in std::iter::once(&params.primary).chain(compares.iter()) {
        if !is_valid_issue_code(code) {
            return Err(AppError::Validation(format!(
                "Invalid stock issue code '{}'",
                code
            )));
        }
    }

    let mut codes: Vec<String> = Vec::with_capacity(compares.len() + 1);
    codes.push(params.primary.clone());
    codes.extend(compares.iter().cloned());

    let mut histories = price_queries::fetch_all_batch(pool, &codes).await.map_err(|e| {
        error!("Failed to load chart histories for {:?}: {}", codes, e);
        AppError::Db(e)
    })?;

    let primary_records = histories.remove(&params.primary).unwrap_or_default();
    if primary_records.is_empty() {
        return Err(AppError::NotFound(format!(
            "No price data for stock issue {}",
            params.primary
        )));
    }

    let zoom = resolve_zoom(&primary_records, params)?;

    let mode = if compares.is_empty() {
        SeriesMode::Single
    } else {
        SeriesMode::Compare
    };

    // The primary is always source 0; markers read their y-values off it.
    let compare_records: Vec<(String, Vec<PriceRecord>)> = compares
        .iter()
        .map(|code| (code.clone(), histories.remove(code).unwrap_or_default()))
        .collect();

    let mut sources = vec![SeriesSource {
        stock_issue_code: &params.primary,
        records: &primary_records,
    }];
    for (code, records) in &compare_records {
        sources.push(SeriesSource {
            stock_issue_code: code,
            records,
        });
    }

    let series = series_builder::build_series(&sources, indicators, zoom, mode);

    let news_items =
        news_service::fetch_news_items(pool, group_id, &codes[..1], None, 1).await?;
    let markers = marker_selector::select_markers(&news_items, zoom, &series[0]);

    Ok(ChartResponse {
        zoom,
        series,
        markers,
    })
}

fn parse_indicators(raw: Option<&str>) -> Result<SelectedIndicators, AppError> {
    let mut keys = Vec::new();
    for value in split_codes(raw) {
        let key = IndicatorKey::parse(&value)
            .ok_or_else(|| AppError::Validation(format!("Unknown indicator '{}'", value)))?;
        keys.push(key);
    }
    Ok(SelectedIndicators::from_keys(&keys))
}

/// The window the caller asked for, defaulted per variant: the full range in
/// the analytics view, the most recent 31 trading days in the editor.
fn resolve_zoom(records: &[PriceRecord], params: &ChartParams) -> Result<ZoomWindow, AppError> {
    let default = match params.variant {
        ChartVariant::Analytics => ZoomWindow::full_range(records),
        ChartVariant::Editor => ZoomWindow::recent(records, ZoomWindow::EDITOR_DEFAULT_DAYS),
    }
    .ok_or_else(|| AppError::Validation("Price history is empty".to_string()))?;

    let start = params.from.unwrap_or(default.start);
    let end = params.to.unwrap_or(default.end);
    Ok(ZoomWindow::new(start, end))
}
