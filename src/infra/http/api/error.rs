use crate::application::{
    counter::CounterError, error::ErrorReport, repos::RepoError, users::UserServiceError,
};
use crate::domain::error::DomainError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    /// Logged through the error report, never sent to the client.
    detail: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn invalid_input(hint: String) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(hint),
        )
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self
            .detail
            .clone()
            .or_else(|| self.hint.clone())
            .unwrap_or_else(|| self.message.to_string());
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {detail}", self.code),
        )
        .attach(&mut response);
        response
    }
}

fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            None,
        )
        .with_detail(message),
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Domain(DomainError::Validation { field, message }) => {
                ApiError::invalid_input(format!("{field}: {message}"))
            }
            UserServiceError::Domain(DomainError::NotFound { .. }) => {
                ApiError::not_found("User not found")
            }
            UserServiceError::Repo(err) => repo_to_api(err),
        }
    }
}

impl From<CounterError> for ApiError {
    fn from(err: CounterError) -> Self {
        match err {
            CounterError::StoreUnavailable(err) => repo_to_api(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_conflict() {
        let err = ApiError::from(UserServiceError::Repo(RepoError::Duplicate {
            constraint: "users_email_key".to_string(),
        }));
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn persistence_detail_is_not_exposed() {
        let err = ApiError::from(CounterError::StoreUnavailable(
            RepoError::from_persistence("connection reset by peer"),
        ));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.hint.is_none());
        assert_eq!(err.detail.as_deref(), Some("connection reset by peer"));
    }

    #[test]
    fn validation_maps_to_bad_request_with_field_hint() {
        let err = ApiError::from(UserServiceError::Domain(DomainError::validation(
            "email",
            "missing `@`",
        )));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.hint.as_deref(), Some("email: missing `@`"));
    }
}
