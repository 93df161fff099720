//! Route definitions for the Pulseboard API.

pub mod auth;
pub mod dashboard;
pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::AppState;

/// Assemble the full application router.
pub fn api_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/auth/oauth/{provider}", get(auth::oauth));

    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::view))
        .route("/dashboard/filter", put(dashboard::select_filter))
        .route("/dashboard/filter/active", put(dashboard::toggle_filter))
        .route("/dashboard/refresh", post(dashboard::refresh));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", auth_routes.merge(dashboard_routes))
        .with_state(state)
}
