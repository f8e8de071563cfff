use axum::extract::{Path, Query, State};
use axum::{routing::get, Json, Router};
use tracing::info;

use crate::auth::AuthUser;
use crate::db::stock_issue_queries;
use crate::errors::AppError;
use crate::models::{StockIssue, StockIssueSearchParams, StockIssueSearchResponse};
use crate::state::AppState;
use crate::utils::remove_legal_type;

const PAGE_SIZE: i64 = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_stock_issues))
        .route("/:code", get(get_stock_issue))
}

async fn search_stock_issues(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<StockIssueSearchParams>,
) -> Result<Json<StockIssueSearchResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    // Legal-type suffixes are stripped so "株式会社ほげ" matches "ほげ".
    let query = params
        .q
        .map(|q| remove_legal_type(&q))
        .unwrap_or_default();

    info!("GET /stock-issues - q='{}' page={}", query, page);

    let offset = (page - 1) * PAGE_SIZE;
    let values = stock_issue_queries::search(&state.pool, &query, PAGE_SIZE, offset).await?;
    let total = stock_issue_queries::count_matching(&state.pool, &query).await?;

    Ok(Json(StockIssueSearchResponse { values, page, total }))
}

async fn get_stock_issue(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<StockIssue>, AppError> {
    info!("GET /stock-issues/{} - Getting stock issue", code);

    let issue = stock_issue_queries::fetch_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock issue {} not found", code)))?;

    Ok(Json(issue))
}
