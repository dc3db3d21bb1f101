//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Primary key of the single `visitor_counts` row.
pub const VISITOR_COUNT_ID: i32 = 1;

/// The authoritative page-view total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorCount {
    pub id: i32,
    pub count: i64,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
