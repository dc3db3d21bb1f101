use serde::{Deserialize, Serialize};

use crate::domain::entities::UserRecord;

#[derive(Debug, Deserialize, Serialize)]
pub struct UserCreateRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<UserRecord>,
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub total: i64,
}
