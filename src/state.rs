use std::sync::Arc;
use sqlx::PgPool;
use crate::auth::{IdentityProvider, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub identity: Arc<dyn IdentityProvider>,
    pub tokens: Arc<TokenService>,
}
