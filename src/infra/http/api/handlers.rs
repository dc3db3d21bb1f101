use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use super::error::ApiError;
use super::models::{UserCreateRequest, UserListQuery, UserListResponse, ViewsResponse};
use super::state::ApiState;

pub async fn list_users(
    State(state): State<ApiState>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.users.list(query.limit).await?;
    Ok(Json(UserListResponse { items }))
}

pub async fn get_user(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<ApiState>,
    Json(payload): Json<UserCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .create(&payload.username, &payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Current total without counting a view.
pub async fn get_views(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let total = state.counter.current_total().await?;
    Ok(Json(ViewsResponse { total }))
}
