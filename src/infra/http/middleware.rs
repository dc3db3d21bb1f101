use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let ctx = RequestContext {
        request_id: request_id.clone(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.extensions_mut().insert(ctx);
    response
}

/// Log every 4xx/5xx with the [`ErrorReport`] its handler attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let elapsed_ms = start.elapsed().as_millis();
    let (source, detail) = summarize(response.extensions_mut().remove::<ErrorReport>());

    if status.is_server_error() {
        error!(
            target: "hitcount::http::response",
            status = status.as_u16(),
            %method,
            %path,
            elapsed_ms,
            source,
            %detail,
            %request_id,
            "request failed",
        );
    } else {
        warn!(
            target: "hitcount::http::response",
            status = status.as_u16(),
            %method,
            %path,
            elapsed_ms,
            source,
            %detail,
            %request_id,
            "client request error",
        );
    }

    response
}

/// Origin of the failure and its error chain, outermost first.
fn summarize(report: Option<ErrorReport>) -> (&'static str, String) {
    match report {
        Some(report) if !report.messages.is_empty() => (report.source, report.messages.join(": ")),
        Some(report) => (report.source, "no diagnostic available".to_string()),
        None => ("unknown", "no diagnostic available".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn summary_joins_the_error_chain() {
        let report = ErrorReport {
            source: "application::counter",
            status: StatusCode::INTERNAL_SERVER_ERROR,
            messages: vec![
                "counter store unavailable".to_string(),
                "persistence error: pool closed".to_string(),
            ],
        };

        assert_eq!(
            summarize(Some(report)),
            (
                "application::counter",
                "counter store unavailable: persistence error: pool closed".to_string()
            )
        );
    }

    #[test]
    fn missing_report_is_labelled_unknown() {
        assert_eq!(
            summarize(None),
            ("unknown", "no diagnostic available".to_string())
        );
    }
}
