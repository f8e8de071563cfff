use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{compare_list_queries, stock_issue_queries};
use crate::errors::AppError;
use crate::models::{
    AddCompareListItemRequest, CompareList, CompareListDetailResponse, CompareListItem,
    CreateCompareListRequest, UpdateCompareListRequest,
};
use crate::services::group_service;
use crate::state::AppState;
use crate::utils::is_valid_issue_code;

pub fn router() -> Router<AppState> {
    Router::new()
        // Compare List CRUD
        .route("/:group_id/compare-lists", post(create_list))
        .route("/:group_id/compare-lists", get(list_lists))
        .route("/:group_id/compare-lists/:list_id", get(get_list))
        .route("/:group_id/compare-lists/:list_id", put(rename_list))
        .route("/:group_id/compare-lists/:list_id", delete(delete_list))
        // Items
        .route("/:group_id/compare-lists/:list_id/items", post(add_item))
        .route(
            "/:group_id/compare-lists/:list_id/items/:item_id",
            delete(remove_item),
        )
}

async fn create_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<CreateCompareListRequest>,
) -> Result<(StatusCode, Json<CompareList>), AppError> {
    info!("POST /groups/{}/compare-lists - Creating '{}'", group_id, req.name);

    group_service::require_membership(&state.pool, &user, group_id).await?;

    if req.name.trim().is_empty() {
        return Err(AppError::Validation("List name must not be empty".to_string()));
    }

    let list = compare_list_queries::create_list(&state.pool, group_id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

async fn list_lists(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<CompareList>>, AppError> {
    info!("GET /groups/{}/compare-lists - Listing", group_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;
    let lists = compare_list_queries::fetch_lists_for_group(&state.pool, group_id).await?;
    Ok(Json(lists))
}

async fn get_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CompareListDetailResponse>, AppError> {
    info!("GET /groups/{}/compare-lists/{} - Getting detail", group_id, list_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;

    let list = compare_list_queries::fetch_list(&state.pool, group_id, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Compare list {} not found", list_id)))?;
    let items = compare_list_queries::fetch_items(&state.pool, list_id).await?;

    Ok(Json(CompareListDetailResponse {
        id: list.id,
        group_id: list.group_id,
        name: list.name,
        items,
        created_at: list.created_at,
        updated_at: list.updated_at,
    }))
}

async fn rename_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, list_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateCompareListRequest>,
) -> Result<Json<CompareList>, AppError> {
    info!("PUT /groups/{}/compare-lists/{} - Renaming", group_id, list_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;

    if req.name.trim().is_empty() {
        return Err(AppError::Validation("List name must not be empty".to_string()));
    }

    compare_list_queries::fetch_list(&state.pool, group_id, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Compare list {} not found", list_id)))?;

    let list = compare_list_queries::rename_list(&state.pool, group_id, list_id, &req.name).await?;
    Ok(Json(list))
}

async fn delete_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /groups/{}/compare-lists/{} - Deleting", group_id, list_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;
    compare_list_queries::delete_list(&state.pool, group_id, list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// Item Handlers
// ==============================================================================

async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, list_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AddCompareListItemRequest>,
) -> Result<(StatusCode, Json<CompareListItem>), AppError> {
    info!(
        "POST /groups/{}/compare-lists/{}/items - Adding {}",
        group_id, list_id, req.stock_issue_code
    );

    group_service::require_membership(&state.pool, &user, group_id).await?;

    if !is_valid_issue_code(&req.stock_issue_code) {
        return Err(AppError::Validation(format!(
            "Invalid stock issue code '{}'",
            req.stock_issue_code
        )));
    }

    compare_list_queries::fetch_list(&state.pool, group_id, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Compare list {} not found", list_id)))?;

    stock_issue_queries::fetch_by_code(&state.pool, &req.stock_issue_code)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Stock issue {} not found", req.stock_issue_code))
        })?;

    let item =
        compare_list_queries::add_item(&state.pool, list_id, &req.stock_issue_code).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, list_id, item_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    info!(
        "DELETE /groups/{}/compare-lists/{}/items/{} - Removing",
        group_id, list_id, item_id
    );

    group_service::require_membership(&state.pool, &user, group_id).await?;

    compare_list_queries::fetch_list(&state.pool, group_id, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Compare list {} not found", list_id)))?;

    compare_list_queries::remove_item(&state.pool, list_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
