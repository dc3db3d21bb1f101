use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::{
        counter::CounterService,
        error::{ErrorReport, HttpError},
        health::ReadinessCheck,
    },
    presentation::views::{IndexTemplate, render_template_response},
};

use super::RouterState;

#[derive(Clone)]
pub struct HttpState {
    pub counter: Arc<CounterService>,
    pub readiness: Arc<ReadinessCheck>,
}

pub(super) fn routes() -> Router<RouterState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.counter.record_view().await {
        Ok(total_views) => {
            render_template_response(IndexTemplate::new(total_views), StatusCode::OK)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn health(State(state): State<HttpState>) -> Response {
    let report = state.readiness.check().await;
    if report.is_healthy() {
        return (StatusCode::OK, Json(report)).into_response();
    }

    let failing = report
        .checks
        .iter()
        .filter(|check| !check.healthy)
        .map(|check| {
            format!(
                "{}: {}",
                check.name,
                check.error.as_deref().unwrap_or("unavailable")
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(report)).into_response();
    ErrorReport::from_message(
        "infra::http::health",
        StatusCode::SERVICE_UNAVAILABLE,
        failing,
    )
    .attach(&mut response);
    response
}
