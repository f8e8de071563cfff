use serde::{Deserialize, Serialize};

/// Claims of the locally signed access token handed to the dashboard. The
/// x-hasura-* names are what the frontend inspects to derive the caller's
/// role and user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasuraClaims {
    pub sub: String,
    pub email: String,
    #[serde(rename = "x-hasura-default-role")]
    pub default_role: String,
    #[serde(rename = "x-hasura-user-id")]
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}
