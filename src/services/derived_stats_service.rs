use bigdecimal::BigDecimal;
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use std::str::FromStr;
use tracing::error;

use crate::db::price_queries::{DerivedStatsRow, RawPriceRow};
use crate::db::{price_queries, stock_issue_queries};
use crate::errors::AppError;
use crate::services::indicators::{
    self, SMA_13W_WINDOW, SMA_1D_WINDOW, SMA_26W_WINDOW, SMA_5W_WINDOW,
};

/// Recompute turnover and the four moving averages for one instrument and
/// persist them onto its price rows. Returns the number of rows written.
pub async fn refresh_for_code(pool: &PgPool, code: &str) -> Result<usize, AppError> {
    let records = price_queries::fetch_all(pool, code).await.map_err(|e| {
        error!("Failed to load prices for {}: {}", code, e);
        AppError::Db(e)
    })?;

    if records.is_empty() {
        return Ok(0);
    }

    let closes: Vec<BigDecimal> = records.iter().map(|r| r.close.clone()).collect();
    let sma1d = indicators::sma(&closes, SMA_1D_WINDOW);
    let sma5w = indicators::sma(&closes, SMA_5W_WINDOW);
    let sma13w = indicators::sma(&closes, SMA_13W_WINDOW);
    let sma26w = indicators::sma(&closes, SMA_26W_WINDOW);

    let rows: Vec<DerivedStatsRow> = records
        .iter()
        .enumerate()
        .map(|(i, r)| DerivedStatsRow {
            date: r.date,
            turnover: indicators::turnover(&r.close, r.volume),
            sma1d: sma1d[i].clone(),
            sma5w: sma5w[i].clone(),
            sma13w: sma13w[i].clone(),
            sma26w: sma26w[i].clone(),
        })
        .collect();

    price_queries::update_derived_stats(pool, code, &rows)
        .await
        .map_err(|e| {
            error!("Failed to persist derived stats for {}: {}", code, e);
            AppError::Db(e)
        })?;

    Ok(rows.len())
}

/// Development helper: seed an instrument with a 180-day random walk so the
/// chart has something to draw.
pub async fn generate_mock(pool: &PgPool, code: &str) -> Result<(), AppError> {
    stock_issue_queries::upsert(pool, code, &format!("Mock Issue {}", code)).await?;

    let today = Utc::now().date_naive();
    let mut points: Vec<RawPriceRow> = Vec::new();
    let mut current = 1000.0_f64;

    for i in (0..180).rev() {
        let prev = current;
        current *= 1.0 + (rand::random::<f64>() - 0.5) * 0.04;
        let high = current.max(prev) * (1.0 + rand::random::<f64>() * 0.01);
        let low = current.min(prev) * (1.0 - rand::random::<f64>() * 0.01);
        let volume = 100_000 + (rand::random::<f64>() * 900_000.0) as i64;

        points.push(RawPriceRow {
            date: today - ChronoDuration::days(i),
            open: to_decimal(prev)?,
            high: to_decimal(high)?,
            low: to_decimal(low)?,
            close: to_decimal(current)?,
            volume,
        });
    }

    price_queries::upsert_raw_points(pool, code, &points)
        .await
        .map_err(|e| {
            error!("Failed to generate mock prices for {}: {}", code, e);
            AppError::Db(e)
        })?;

    refresh_for_code(pool, code).await?;
    Ok(())
}

fn to_decimal(value: f64) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(&format!("{:.2}", value))
        .map_err(|e| AppError::External(format!("Failed to convert price value: {}", e)))
}
