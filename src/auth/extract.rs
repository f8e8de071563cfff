use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::AccountRole;
use crate::state::AppState;

/// The verified caller of a request, decoded from the bearer access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: AccountRole,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected bearer token".to_string()))?;

        let claims = state.tokens.verify(token)?;

        let user_id = Uuid::parse_str(&claims.user_id)
            .map_err(|_| AppError::Unauthorized("Malformed user id claim".to_string()))?;
        let role = AccountRole::parse(&claims.default_role)
            .ok_or_else(|| AppError::Unauthorized("Unrecognized role claim".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
            role,
        })
    }
}
