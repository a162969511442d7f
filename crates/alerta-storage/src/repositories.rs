// Repository layer for database operations
//
// Hand-written parameterized SQL, one statement per method. There are no
// retries and no multi-statement transactions; a storage failure
// propagates unchanged to the caller.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations up to the latest version.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    pub async fn create_emergency(&self, input: CreateEmergency) -> Result<EmergencyRow> {
        let row = sqlx::query_as::<_, EmergencyRow>(
            r#"
            INSERT INTO emergencies (room_id, occurred_at)
            VALUES ($1, $2)
            RETURNING id, room_id, occurred_at
            "#,
        )
        .bind(input.room_id)
        .bind(input.occurred_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_emergency(&self, id: i32) -> Result<Option<EmergencyRow>> {
        let row = sqlx::query_as::<_, EmergencyRow>(
            r#"
            SELECT id, room_id, occurred_at
            FROM emergencies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_emergencies(&self) -> Result<Vec<EmergencyRow>> {
        let rows = sqlx::query_as::<_, EmergencyRow>(
            r#"
            SELECT id, room_id, occurred_at
            FROM emergencies
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_emergencies_by_room(&self, room_id: i32) -> Result<Vec<EmergencyRow>> {
        let rows = sqlx::query_as::<_, EmergencyRow>(
            r#"
            SELECT id, room_id, occurred_at
            FROM emergencies
            WHERE room_id = $1
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Bounds are inclusive on both ends. An inverted range matches nothing.
    pub async fn list_emergencies_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<EmergencyRow>> {
        let rows = sqlx::query_as::<_, EmergencyRow>(
            r#"
            SELECT id, room_id, occurred_at
            FROM emergencies
            WHERE occurred_at >= $1 AND occurred_at <= $2
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_emergencies_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<EmergencyRow>> {
        let rows = sqlx::query_as::<_, EmergencyRow>(
            r#"
            SELECT id, room_id, occurred_at
            FROM emergencies
            WHERE occurred_at >= $1
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_emergencies_by_room(&self, room_id: i32) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM emergencies
            WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Overwrites both mutable columns with the given values; no column is
    /// preserved from the existing row. Returns `None` when the id does
    /// not exist.
    pub async fn update_emergency(
        &self,
        id: i32,
        input: UpdateEmergency,
    ) -> Result<Option<EmergencyRow>> {
        let row = sqlx::query_as::<_, EmergencyRow>(
            r#"
            UPDATE emergencies
            SET room_id = $2, occurred_at = $3
            WHERE id = $1
            RETURNING id, room_id, occurred_at
            "#,
        )
        .bind(id)
        .bind(input.room_id)
        .bind(input.occurred_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_emergency(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM emergencies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn emergency_exists(&self, id: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM emergencies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
