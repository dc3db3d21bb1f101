pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{Router, routing::get};

use crate::infra::http::RouterState;

pub(super) fn routes() -> Router<RouterState> {
    Router::new()
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/{id}", get(handlers::get_user))
        .route("/api/views", get(handlers::get_views))
}
