use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::{AccessToken, AuthUser, IdentityError};
use crate::db::user_queries;
use crate::errors::AppError;
use crate::models::AccountRole;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(exchange_token))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
struct ExchangeTokenRequest {
    id_token: String,
}

/// Exchange the identity provider's ID token for a locally signed access
/// token carrying the caller's role and user id.
async fn exchange_token(
    State(state): State<AppState>,
    Json(req): Json<ExchangeTokenRequest>,
) -> Result<Json<AccessToken>, AppError> {
    info!("POST /auth/token - Exchanging ID token");

    let identity = state
        .identity
        .verify_id_token(&req.id_token)
        .await
        .map_err(|e| match e {
            IdentityError::Network(msg) => {
                error!("Identity provider unreachable: {}", msg);
                AppError::External(msg)
            }
            other => AppError::Unauthorized(other.to_string()),
        })?;

    let user = user_queries::upsert_by_email(&state.pool, &identity.email)
        .await
        .map_err(|e| {
            error!("Failed to upsert user {}: {}", identity.email, e);
            AppError::Db(e)
        })?;

    let access = state.tokens.mint(&user)?;
    Ok(Json(access))
}

#[derive(Debug, Serialize)]
struct MeResponse {
    user_id: Uuid,
    email: String,
    role: AccountRole,
}

async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
        email: user.email,
        role: user.role,
    })
}
