use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{group_queries, member_queries, user_queries};
use crate::errors::AppError;
use crate::models::{
    AccountRole, AddGroupMemberRequest, CreateGroupRequest, GroupMember, GroupMemberDetail,
    GroupResponse, GroupRole, UpdateGroupMemberRequest, UpdateGroupRequest,
};
use crate::services::group_service;
use crate::state::AppState;
use crate::utils::is_valid_issue_code;

pub fn router() -> Router<AppState> {
    Router::new()
        // Group CRUD
        .route("/", post(create_group))
        .route("/", get(list_groups))
        .route("/:group_id", get(get_group))
        .route("/:group_id", put(update_group))
        .route("/:group_id", delete(delete_group))
        // Members
        .route("/:group_id/members", get(list_members))
        .route("/:group_id/members", post(add_member))
        .route("/:group_id/members/:member_id", put(update_member))
        .route("/:group_id/members/:member_id", delete(remove_member))
}

fn require_staff(user: &AuthUser) -> Result<(), AppError> {
    if user.role != AccountRole::Staff {
        return Err(AppError::Forbidden("Staff account required".to_string()));
    }
    Ok(())
}

fn validate_issue_code(code: &Option<String>) -> Result<(), AppError> {
    if let Some(code) = code {
        if !is_valid_issue_code(code) {
            return Err(AppError::Validation(format!(
                "Invalid stock issue code '{}'",
                code
            )));
        }
    }
    Ok(())
}

// ==============================================================================
// Group CRUD Handlers
// ==============================================================================

async fn create_group(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    info!("POST /groups - Creating group '{}'", req.name);
    require_staff(&user)?;

    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Group name must not be empty".to_string()));
    }
    validate_issue_code(&req.stock_issue_code)?;

    let group = group_queries::create_group(&state.pool, &req).await.map_err(|e| {
        error!("Failed to create group '{}': {}", req.name, e);
        AppError::Db(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(group_service::to_response(group, GroupRole::Staff)),
    ))
}

async fn list_groups(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<GroupResponse>>, AppError> {
    info!("GET /groups - Listing groups for {}", user.email);

    let groups = if user.role == AccountRole::Staff {
        group_queries::fetch_all_groups(&state.pool).await?
    } else {
        group_queries::fetch_groups_for_user(&state.pool, user.user_id).await?
    };

    let mut responses = Vec::with_capacity(groups.len());
    for group in groups {
        let role = group_service::resolve_role(&state.pool, &user, group.id).await?;
        responses.push(group_service::to_response(group, role));
    }

    Ok(Json(responses))
}

async fn get_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupResponse>, AppError> {
    info!("GET /groups/{} - Getting group", group_id);

    let role = group_service::require_membership(&state.pool, &user, group_id).await?;
    let group = group_queries::fetch_group(&state.pool, group_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Group {} not found", group_id)))?;

    Ok(Json(group_service::to_response(group, role)))
}

async fn update_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<GroupResponse>, AppError> {
    info!("PUT /groups/{} - Updating group", group_id);

    let role = group_service::require_membership(&state.pool, &user, group_id).await?;
    group_service::authorize_update(&req, role)?;
    validate_issue_code(&req.stock_issue_code)?;

    group_queries::fetch_group(&state.pool, group_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Group {} not found", group_id)))?;

    let group = group_queries::update_group(&state.pool, group_id, &req).await.map_err(|e| {
        error!("Failed to update group {}: {}", group_id, e);
        AppError::Db(e)
    })?;

    Ok(Json(group_service::to_response(group, role)))
}

async fn delete_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /groups/{} - Deleting group", group_id);
    require_staff(&user)?;

    group_queries::delete_group(&state.pool, group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// Member Handlers
// ==============================================================================

fn require_manager(role: GroupRole) -> Result<(), AppError> {
    if !matches!(role, GroupRole::Staff | GroupRole::Owner) {
        return Err(AppError::Forbidden(
            "Only staff or an owner may manage members".to_string(),
        ));
    }
    Ok(())
}

async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<GroupMemberDetail>>, AppError> {
    info!("GET /groups/{}/members - Listing members", group_id);

    group_service::require_membership(&state.pool, &user, group_id).await?;
    let members = member_queries::fetch_members(&state.pool, group_id).await?;
    Ok(Json(members))
}

async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<AddGroupMemberRequest>,
) -> Result<(StatusCode, Json<GroupMember>), AppError> {
    info!("POST /groups/{}/members - Inviting {}", group_id, req.email);

    let role = group_service::require_membership(&state.pool, &user, group_id).await?;
    require_manager(role)?;

    let group = group_queries::fetch_group(&state.pool, group_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Group {} not found", group_id)))?;

    let member_count = member_queries::count_members(&state.pool, group_id).await?;
    if member_count >= group.max_users as i64 {
        return Err(AppError::Validation(format!(
            "Group already has the maximum of {} members",
            group.max_users
        )));
    }

    // Inviting an address that has never signed in creates the account row;
    // the invitee picks it up on first token exchange.
    let invited = user_queries::upsert_by_email(&state.pool, &req.email).await?;

    if member_queries::fetch_membership(&state.pool, group_id, invited.id)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(format!(
            "{} is already a member",
            req.email
        )));
    }

    let member = member_queries::add_member(
        &state.pool,
        group_id,
        invited.id,
        req.is_owner.unwrap_or(false),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

async fn update_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, member_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateGroupMemberRequest>,
) -> Result<Json<GroupMember>, AppError> {
    info!("PUT /groups/{}/members/{} - Updating member", group_id, member_id);

    let role = group_service::require_membership(&state.pool, &user, group_id).await?;
    require_manager(role)?;

    let member = member_queries::update_member(&state.pool, group_id, member_id, req.is_owner)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(format!("Member {} not found", member_id))
            }
            other => AppError::Db(other),
        })?;

    Ok(Json(member))
}

async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((group_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /groups/{}/members/{} - Removing member", group_id, member_id);

    let role = group_service::require_membership(&state.pool, &user, group_id).await?;
    require_manager(role)?;

    member_queries::remove_member(&state.pool, group_id, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
