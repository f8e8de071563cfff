use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::db::price_queries;
use crate::errors::AppError;
use crate::models::{AccountRole, PriceRangeParams, PriceRecord};
use crate::services::derived_stats_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:code", get(get_prices))
        .route("/:code/refresh-derived", post(refresh_derived))
        .route("/:code/mock", post(generate_mock_prices))
}

pub async fn get_prices(
    Path(code): Path<String>,
    Query(range): Query<PriceRangeParams>,
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<PriceRecord>>, AppError> {
    info!("GET /prices/{} - Getting price history", code);
    let prices = price_queries::fetch_range(&state.pool, &code, range.from, range.to)
        .await
        .map_err(|e| {
            error!("Failed to get price history for {}: {}", code, e);
            AppError::Db(e)
        })?;
    Ok(Json(prices))
}

pub async fn refresh_derived(
    Path(code): Path<String>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    info!("POST /prices/{}/refresh-derived - Recomputing derived stats", code);

    if user.role != AccountRole::Staff {
        return Err(AppError::Forbidden("Staff account required".to_string()));
    }

    let updated = derived_stats_service::refresh_for_code(&state.pool, &code).await?;
    if updated == 0 {
        return Err(AppError::NotFound(format!("No price data for {}", code)));
    }
    Ok(StatusCode::OK)
}

pub async fn generate_mock_prices(
    Path(code): Path<String>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    info!("POST /prices/{}/mock - Generating mock prices", code);

    if user.role != AccountRole::Staff {
        return Err(AppError::Forbidden("Staff account required".to_string()));
    }

    derived_stats_service::generate_mock(&state.pool, &code).await.map_err(|e| {
        error!("Failed to generate mock prices for {}: {}", code, e);
        e
    })?;
    Ok(StatusCode::CREATED)
}
