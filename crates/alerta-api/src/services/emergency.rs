// Emergency service for business logic
//
// Owns the two behaviors that are not plain pass-through: stamping the
// creation timestamp and the full-overwrite update semantics.

use alerta_core::Emergency;
use alerta_storage::{
    models::{CreateEmergency, UpdateEmergency},
    Database, EmergencyRow,
};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::emergencies::{CreateEmergencyRequest, UpdateEmergencyRequest};

/// How far back the "recent" listing reaches.
const RECENT_WINDOW_HOURS: i64 = 24;

pub struct EmergencyService {
    db: Arc<Database>,
}

impl EmergencyService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The stored timestamp is always the server clock at creation time;
    /// a caller-supplied `data` value is discarded.
    pub async fn create(&self, req: CreateEmergencyRequest) -> Result<Emergency> {
        let input = CreateEmergency {
            room_id: req.room_id,
            occurred_at: Some(Utc::now()),
        };
        let row = self.db.create_emergency(input).await?;
        Ok(Self::row_to_emergency(row))
    }

    pub async fn list_all(&self) -> Result<Vec<Emergency>> {
        let rows = self.db.list_emergencies().await?;
        Ok(rows.into_iter().map(Self::row_to_emergency).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Emergency>> {
        let row = self.db.get_emergency(id).await?;
        Ok(row.map(Self::row_to_emergency))
    }

    pub async fn list_by_room(&self, room_id: i32) -> Result<Vec<Emergency>> {
        let rows = self.db.list_emergencies_by_room(room_id).await?;
        Ok(rows.into_iter().map(Self::row_to_emergency).collect())
    }

    /// Bounds come straight from the caller and are inclusive on both
    /// ends. An inverted range yields an empty list, not an error.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Emergency>> {
        let rows = self.db.list_emergencies_between(start, end).await?;
        Ok(rows.into_iter().map(Self::row_to_emergency).collect())
    }

    pub async fn list_recent(&self) -> Result<Vec<Emergency>> {
        let cutoff = Utc::now() - Duration::hours(RECENT_WINDOW_HOURS);
        let rows = self.db.list_emergencies_since(cutoff).await?;
        Ok(rows.into_iter().map(Self::row_to_emergency).collect())
    }

    /// Overwrites `room_id` and `occurred_at` with the request values. A
    /// request without `data` nulls the stored timestamp; there is no
    /// re-defaulting on update. Only the path-addressed record is touched.
    pub async fn update(&self, id: i32, req: UpdateEmergencyRequest) -> Result<Option<Emergency>> {
        let input = UpdateEmergency {
            room_id: req.room_id,
            occurred_at: req.occurred_at,
        };
        let row = self.db.update_emergency(id, input).await?;
        Ok(row.map(Self::row_to_emergency))
    }

    /// `false` means the id did not exist, which callers report as
    /// not-found rather than as a storage error.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        if !self.db.emergency_exists(id).await? {
            return Ok(false);
        }
        self.db.delete_emergency(id).await?;
        Ok(true)
    }

    pub async fn count_by_room(&self, room_id: i32) -> Result<i64> {
        self.db.count_emergencies_by_room(room_id).await
    }

    /// Full descending history for the room, same result as
    /// [`Self::list_by_room`]. The route name suggests a single record,
    /// but the dashboard contract expects the whole list and takes the
    /// first element itself.
    pub async fn latest_by_room(&self, room_id: i32) -> Result<Vec<Emergency>> {
        self.list_by_room(room_id).await
    }

    fn row_to_emergency(row: EmergencyRow) -> Emergency {
        Emergency {
            id: row.id,
            room_id: row.room_id,
            occurred_at: row.occurred_at,
        }
    }
}
