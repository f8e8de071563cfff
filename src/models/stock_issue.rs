use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockIssue {
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockIssueSearchParams {
    pub q: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockIssueSearchResponse {
    pub values: Vec<StockIssue>,
    pub page: i64,
    pub total: i64,
}
