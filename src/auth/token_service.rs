use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::claims::HasuraClaims;
use crate::errors::AppError;
use crate::models::User;

/// Minted tokens within this margin of expiry are treated as expired and
/// re-minted, so a caller never receives a token about to lapse mid-request.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies the dashboard-facing access tokens that stand in for
/// the identity provider's ID tokens on every API request.
pub struct TokenService {
    secret: String,
    ttl: Duration,
    minted: DashMap<Uuid, AccessToken>,
}

impl TokenService {
    pub fn new(secret: String, ttl: Duration) -> Self {
        Self {
            secret,
            ttl,
            minted: DashMap::new(),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .map_err(|_| "AUTH_JWT_SECRET is not set".to_string())?;
        let ttl_secs = std::env::var("AUTH_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<i64>()
            .map_err(|_| "AUTH_TOKEN_TTL_SECS must be an integer".to_string())?;

        Ok(Self::new(secret, Duration::seconds(ttl_secs)))
    }

    /// Return the cached token for this user, or mint a fresh one when none
    /// exists or the cached one is inside the refresh margin.
    pub fn mint(&self, user: &User) -> Result<AccessToken, AppError> {
        let now = Utc::now();

        if let Some(cached) = self.minted.get(&user.id) {
            if cached.expires_at - now > Duration::seconds(REFRESH_MARGIN_SECS) {
                return Ok(cached.clone());
            }
        }

        let expires_at = now + self.ttl;
        let claims = HasuraClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            default_role: user.account_role.clone(),
            user_id: user.id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::External(format!("Failed to sign access token: {}", e)))?;

        let access = AccessToken {
            access_token: token,
            expires_at,
        };
        self.minted.insert(user.id, access.clone());

        Ok(access)
    }

    pub fn verify(&self, token: &str) -> Result<HasuraClaims, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        decode::<HasuraClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid access token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            display_name: None,
            account_role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    fn service() -> TokenService {
        TokenService::new("test-secret".to_string(), Duration::seconds(3600))
    }

    #[test]
    fn test_minted_token_carries_role_and_user_id() {
        let service = service();
        let user = user("staff");

        let access = service.mint(&user).unwrap();
        let claims = service.verify(&access.access_token).unwrap();

        assert_eq!(claims.default_role, "staff");
        assert_eq!(claims.user_id, user.id.to_string());
        assert_eq!(claims.email, user.email);
    }

    #[test]
    fn test_mint_reuses_cached_token_until_refresh_margin() {
        let service = service();
        let user = user("user");

        let first = service.mint(&user).unwrap();
        let second = service.mint(&user).unwrap();

        assert_eq!(first.access_token, second.access_token);
    }

    #[test]
    fn test_verify_rejects_token_from_other_secret() {
        let minted_by = TokenService::new("one".to_string(), Duration::seconds(3600));
        let verified_by = TokenService::new("two".to_string(), Duration::seconds(3600));

        let access = minted_by.mint(&user("user")).unwrap();
        assert!(verified_by.verify(&access.access_token).is_err());
    }
}
