use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// The subject of a successfully verified ID token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("unknown signing key: {0}")]
    UnknownKey(String),
}

/// Seam between the token-exchange flow and whichever identity provider
/// signed the incoming ID token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: String,
}

// ==============================================================================
// Firebase (production): RS256 against the published JWKS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

pub struct FirebaseIdentityProvider {
    jwks_url: String,
    issuer: String,
    audience: String,
    client: reqwest::Client,
    // kid -> RSA components; refreshed when a token arrives with an unseen kid
    keys: DashMap<String, Jwk>,
}

impl FirebaseIdentityProvider {
    pub fn new(jwks_url: String, issuer: String, audience: String) -> Self {
        Self {
            jwks_url,
            issuer,
            audience,
            client: reqwest::Client::new(),
            keys: DashMap::new(),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        let project_id = std::env::var("AUTH_PROJECT_ID")
            .map_err(|_| "AUTH_PROJECT_ID is not set".to_string())?;
        let jwks_url = std::env::var("AUTH_JWKS_URL").unwrap_or_else(|_| {
            "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
                .to_string()
        });
        let issuer = std::env::var("AUTH_ISSUER")
            .unwrap_or_else(|_| format!("https://securetoken.google.com/{}", project_id));

        Ok(Self::new(jwks_url, issuer, project_id))
    }

    async fn refresh_keys(&self) -> Result<(), IdentityError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        self.keys.clear();
        for key in jwks.keys {
            self.keys.insert(key.kid.clone(), key);
        }

        Ok(())
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        if !self.keys.contains_key(kid) {
            self.refresh_keys().await?;
        }

        let jwk = self
            .keys
            .get(kid)
            .ok_or_else(|| IdentityError::UnknownKey(kid.to_string()))?;

        DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header = decode_header(id_token)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("token has no kid".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.clone()]);
        validation.set_issuer(&[self.issuer.clone()]);

        let data = decode::<IdTokenClaims>(id_token, &key, &validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        Ok(VerifiedIdentity {
            subject: data.claims.sub,
            email: data.claims.email,
        })
    }
}

// ==============================================================================
// Local (non-production): HS256 with a shared dev secret
// ==============================================================================

pub struct LocalIdentityProvider {
    secret: String,
}

impl LocalIdentityProvider {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn from_env() -> Result<Self, String> {
        let secret = std::env::var("AUTH_DEV_SECRET")
            .map_err(|_| "AUTH_DEV_SECRET is not set".to_string())?;
        Ok(Self::new(secret))
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let validation = Validation::new(Algorithm::HS256);
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        let data = decode::<IdTokenClaims>(id_token, &key, &validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        Ok(VerifiedIdentity {
            subject: data.claims.sub,
            email: data.claims.email,
        })
    }
}
