pub mod api;
mod middleware;
mod public;

pub use api::ApiState;
pub use middleware::{REQUEST_ID_HEADER, RequestContext};
pub use public::HttpState;

use axum::{Router, extract::FromRef, middleware as axum_middleware};

use self::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct RouterState {
    pub http: HttpState,
    pub api: ApiState,
}

impl FromRef<RouterState> for HttpState {
    fn from_ref(state: &RouterState) -> Self {
        state.http.clone()
    }
}

impl FromRef<RouterState> for ApiState {
    fn from_ref(state: &RouterState) -> Self {
        state.api.clone()
    }
}

/// Assemble the page, health and JSON API routes behind the shared middleware.
pub fn build_router(state: RouterState) -> Router {
    public::routes()
        .merge(api::routes())
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
