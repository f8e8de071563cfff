use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// One trading day for one instrument. OHLCV comes from the feed; turnover and
// the moving averages are derived columns populated by the nightly stats job
// and stay NULL until it has run.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceRecord {
    pub id: Uuid,
    pub stock_issue_code: String,
    pub date: NaiveDate,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
    pub volume: i64,
    pub turnover: Option<BigDecimal>,
    pub sma1d: Option<BigDecimal>,
    pub sma5w: Option<BigDecimal>,
    pub sma13w: Option<BigDecimal>,
    pub sma26w: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
