// Emergency domain types
//
// The single entity of the service: one recorded emergency occurrence,
// tied to a room. Used by both API and storage crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// One emergency occurrence.
///
/// Wire field names follow the contract consumed by the monitoring
/// dashboard (`idEmergencia`, `idSala`, `data`), so every field carries an
/// explicit serde rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Emergency {
    /// Store-assigned identifier, stable for the record's lifetime.
    #[serde(rename = "idEmergencia")]
    pub id: i32,
    /// Room the event belongs to. Opaque external identifier, never null
    /// for a persisted record.
    #[serde(rename = "idSala")]
    pub room_id: i32,
    /// When the emergency occurred. Stamped with the server clock on
    /// creation; an update may set it to null.
    #[serde(rename = "data")]
    pub occurred_at: Option<DateTime<Utc>>,
}
