use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, post, put};
use axum::{routing::get, Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::news_queries;
use crate::errors::AppError;
use crate::models::{
    CreateGroupEventRequest, GroupEvent, NewsItem, NewsQueryParams, UpdateGroupEventRequest,
};
use crate::services::{group_service, news_service};
use crate::state::AppState;
use crate::utils::{is_valid_issue_code, split_codes};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:group_id/news", get(list_news))
        .route("/:group_id/events", post(create_event))
        .route("/:group_id/events/:event_id", put(update_event))
        .route("/:group_id/events/:event_id", delete(delete_event))
}

async fn list_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
    Query(params): Query<NewsQueryParams>,
) -> Result<Json<Vec<NewsItem>>, AppError> {
    info!("GET /groups/{}/news - Listing news items", group_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;

    let codes = split_codes(params.codes.as_deref());
    let items = news_service::fetch_news_items(
        &state.pool,
        group_id,
        &codes,
        params.q.as_deref(),
        params.page.unwrap_or(1),
    )
    .await
    .map_err(|e| {
        error!("Failed to build news feed for group {}: {}", group_id, e);
        e
    })?;

    Ok(Json(items))
}

// ==============================================================================
// Group Event Handlers
// ==============================================================================

async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<CreateGroupEventRequest>,
) -> Result<(StatusCode, Json<GroupEvent>), AppError> {
    info!("POST /groups/{}/events - Creating event", group_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;

    if req.memo.trim().is_empty() {
        return Err(AppError::Validation("Event memo must not be empty".to_string()));
    }
    if !is_valid_issue_code(&req.stock_issue_code) {
        return Err(AppError::Validation(format!(
            "Invalid stock issue code '{}'",
            req.stock_issue_code
        )));
    }

    let event = news_queries::create_group_event(&state.pool, group_id, &req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, event_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateGroupEventRequest>,
) -> Result<Json<GroupEvent>, AppError> {
    info!("PUT /groups/{}/events/{} - Updating event", group_id, event_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;

    news_queries::fetch_group_event(&state.pool, group_id, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    if let Some(memo) = &req.memo {
        if memo.trim().is_empty() {
            return Err(AppError::Validation("Event memo must not be empty".to_string()));
        }
    }

    let event = news_queries::update_group_event(&state.pool, group_id, event_id, &req).await?;
    Ok(Json(event))
}

async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /groups/{}/events/{} - Deleting event", group_id, event_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;
    news_queries::delete_group_event(&state.pool, group_id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
