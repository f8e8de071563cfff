mod app;
mod auth;
mod db;
mod errors;
mod jobs;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::auth::{
    FirebaseIdentityProvider, IdentityProvider, LocalIdentityProvider, TokenService,
};
use crate::logging::LoggingConfig;
use crate::services::scheduler::JobSchedulerService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    // Select identity provider based on AUTH_PROVIDER env var (defaults to firebase)
    let provider_name = std::env::var("AUTH_PROVIDER")
        .unwrap_or_else(|_| "firebase".to_string());

    let identity: Arc<dyn IdentityProvider> = match provider_name.to_lowercase().as_str() {
        "firebase" => {
            tracing::info!("🔐 Using identity provider: Firebase");
            Arc::new(FirebaseIdentityProvider::from_env()
                .expect("Failed to create FirebaseIdentityProvider (check AUTH_PROJECT_ID)"))
        },
        "local" => {
            tracing::info!("🔐 Using identity provider: Local dev secret");
            Arc::new(LocalIdentityProvider::from_env()
                .expect("Failed to create LocalIdentityProvider (check AUTH_DEV_SECRET)"))
        },
        _ => {
            panic!("Invalid AUTH_PROVIDER: {}. Must be 'firebase' or 'local'", provider_name);
        }
    };

    let tokens = Arc::new(TokenService::from_env()
        .expect("Failed to create TokenService (check AUTH_JWT_SECRET)"));

    let mut scheduler = JobSchedulerService::new(Arc::new(pool.clone())).await?;
    scheduler.start().await?;

    let state = AppState {
        pool,
        identity,
        tokens,
    };
    let app = app::create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Stockdash backend running at http://{}/", addr);
    axum::serve(listener, app)
        .await?;

    Ok(())
}
