use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::error;

use crate::models::PriceRecord;

pub async fn fetch_all(
    pool: &PgPool,
    stock_issue_code: &str,
) -> Result<Vec<PriceRecord>, sqlx::Error> {
    sqlx::query_as::<_, PriceRecord>(
        r#"
        SELECT * FROM stock_prices
        WHERE stock_issue_code = $1
        ORDER BY date ASC
        "#,
    )
    .bind(stock_issue_code)
    .fetch_all(pool)
    .await
}

pub async fn fetch_range(
    pool: &PgPool,
    stock_issue_code: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<PriceRecord>, sqlx::Error> {
    sqlx::query_as::<_, PriceRecord>(
        r#"
        SELECT * FROM stock_prices
        WHERE stock_issue_code = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
        ORDER BY date ASC
        "#,
    )
    .bind(stock_issue_code)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// Full histories for several instruments in one query, keyed by code and
/// ordered by date ascending.
pub async fn fetch_all_batch(
    pool: &PgPool,
    codes: &[String],
) -> Result<HashMap<String, Vec<PriceRecord>>, sqlx::Error> {
    if codes.is_empty() {
        return Ok(HashMap::new());
    }

    let records = sqlx::query_as::<_, PriceRecord>(
        r#"
        SELECT * FROM stock_prices
        WHERE stock_issue_code = ANY($1)
        ORDER BY stock_issue_code, date ASC
        "#,
    )
    .bind(codes)
    .fetch_all(pool)
    .await?;

    let mut result: HashMap<String, Vec<PriceRecord>> = HashMap::new();
    for record in records {
        result
            .entry(record.stock_issue_code.clone())
            .or_insert_with(Vec::new)
            .push(record);
    }

    Ok(result)
}

/// A freshly computed derived row: turnover plus the four moving averages
/// for one trading day.
#[derive(Debug, Clone)]
pub struct DerivedStatsRow {
    pub date: NaiveDate,
    pub turnover: BigDecimal,
    pub sma1d: Option<BigDecimal>,
    pub sma5w: Option<BigDecimal>,
    pub sma13w: Option<BigDecimal>,
    pub sma26w: Option<BigDecimal>,
}

pub async fn update_derived_stats(
    pool: &PgPool,
    stock_issue_code: &str,
    rows: &[DerivedStatsRow],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin transaction for {}: {}", stock_issue_code, e);
        e
    })?;

    for row in rows {
        sqlx::query(
            r#"
            UPDATE stock_prices
            SET turnover = $3, sma1d = $4, sma5w = $5, sma13w = $6, sma26w = $7
            WHERE stock_issue_code = $1 AND date = $2
            "#,
        )
        .bind(stock_issue_code)
        .bind(row.date)
        .bind(&row.turnover)
        .bind(&row.sma1d)
        .bind(&row.sma5w)
        .bind(&row.sma13w)
        .bind(&row.sma26w)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit derived stats for {}: {}", stock_issue_code, e);
        e
    })?;
    Ok(())
}

/// Raw OHLCV for one day, as inserted by the feed (or the mock generator).
#[derive(Debug, Clone)]
pub struct RawPriceRow {
    pub date: NaiveDate,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
    pub volume: i64,
}

pub async fn upsert_raw_points(
    pool: &PgPool,
    stock_issue_code: &str,
    points: &[RawPriceRow],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for p in points {
        sqlx::query(
            r#"
            INSERT INTO stock_prices (stock_issue_code, date, open, high, low, close, volume)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (stock_issue_code, date)
            DO UPDATE SET open = EXCLUDED.open, high = EXCLUDED.high, low = EXCLUDED.low,
                          close = EXCLUDED.close, volume = EXCLUDED.volume
            "#,
        )
        .bind(stock_issue_code)
        .bind(p.date)
        .bind(&p.open)
        .bind(&p.high)
        .bind(&p.low)
        .bind(&p.close)
        .bind(p.volume)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
