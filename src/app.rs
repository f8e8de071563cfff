use axum::Router;
use http::Method;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{auth, charts, compare_lists, groups, health, news, prices, stock_issues};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest(
            "/api/groups",
            groups::router()
                .merge(news::router())
                .merge(compare_lists::router())
                .merge(charts::router()),
        )
        .nest("/api/stock-issues", stock_issues::router())
        .nest("/api/prices", prices::router())
        .layer(cors)
        .with_state(state)
}
