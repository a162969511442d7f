// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EmergencyRow {
    pub id: i32,
    pub room_id: i32,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateEmergency {
    pub room_id: i32,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Full overwrite of the mutable columns. Both fields are applied as given;
/// a `None` timestamp nulls the stored column.
#[derive(Debug, Clone)]
pub struct UpdateEmergency {
    pub room_id: i32,
    pub occurred_at: Option<DateTime<Utc>>,
}
