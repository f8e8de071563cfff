use axum::extract::{Path, Query, State};
use axum::{routing::get, Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{ChartParams, ChartResponse};
use crate::services::{chart_service, group_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:group_id/chart", get(get_chart))
}

/// Derived chart payload: one series per requested instrument, rebased when
/// comparisons are present, plus the news markers inside the zoom window.
async fn get_chart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
    Query(params): Query<ChartParams>,
) -> Result<Json<ChartResponse>, AppError> {
    info!(
        "GET /groups/{}/chart - primary={} compares={:?}",
        group_id, params.primary, params.compares
    );

    group_service::require_membership(&state.pool, &user, group_id).await?;

    let response = chart_service::build_chart(&state.pool, group_id, &params)
        .await
        .map_err(|e| {
            error!("Failed to build chart for {}: {}", params.primary, e);
            e
        })?;

    Ok(Json(response))
}
