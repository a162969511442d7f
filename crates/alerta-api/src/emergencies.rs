// Emergency CRUD HTTP routes

use alerta_core::Emergency;
use alerta_storage::Database;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::services::EmergencyService;

/// App state for emergency routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EmergencyService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(EmergencyService::new(db)),
        }
    }
}

/// Request body for recording an emergency. A supplied `data` value is
/// accepted and discarded; the server stamps its own clock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEmergencyRequest {
    #[serde(rename = "idSala")]
    pub room_id: i32,
    #[serde(rename = "data")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Request body for updating an emergency. Both fields are applied as
/// given, so omitting `data` nulls the stored timestamp. An id in the
/// body is ignored; the path selects the record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEmergencyRequest {
    #[serde(rename = "idSala")]
    pub room_id: i32,
    #[serde(rename = "data")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Query parameters for the date-range listing. Both bounds are required
/// ISO-8601 date-times, inclusive on both ends.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    #[serde(rename = "dataInicio")]
    pub start: DateTime<Utc>,
    #[serde(rename = "dataFim")]
    pub end: DateTime<Utc>,
}

/// Create emergency routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/emergencias",
            post(create_emergency).get(list_emergencies),
        )
        .route("/api/emergencias/recentes", get(list_recent_emergencies))
        .route("/api/emergencias/periodo", get(list_emergencies_by_period))
        .route("/api/emergencias/health", get(health))
        .route(
            "/api/emergencias/{id}",
            get(get_emergency)
                .put(update_emergency)
                .delete(delete_emergency),
        )
        .route(
            "/api/emergencias/sala/{id_sala}",
            get(list_emergencies_by_room),
        )
        .route(
            "/api/emergencias/sala/{id_sala}/contagem",
            get(count_emergencies_by_room),
        )
        .route(
            "/api/emergencias/sala/{id_sala}/ultima",
            get(latest_emergency_by_room),
        )
        .with_state(state)
}

/// POST /api/emergencias - Record a new emergency
#[utoipa::path(
    post,
    path = "/api/emergencias",
    request_body = CreateEmergencyRequest,
    responses(
        (status = 201, description = "Emergency recorded", body = Emergency),
        (status = 400, description = "Missing or malformed field"),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn create_emergency(
    State(state): State<AppState>,
    Json(req): Json<CreateEmergencyRequest>,
) -> Result<(StatusCode, Json<Emergency>), StatusCode> {
    let emergency = state.service.create(req).await.map_err(|e| {
        tracing::error!("Failed to create emergency: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((StatusCode::CREATED, Json(emergency)))
}

/// GET /api/emergencias - List all emergencies
#[utoipa::path(
    get,
    path = "/api/emergencias",
    responses(
        (status = 200, description = "All recorded emergencies", body = Vec<Emergency>),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn list_emergencies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Emergency>>, StatusCode> {
    let emergencies = state.service.list_all().await.map_err(|e| {
        tracing::error!("Failed to list emergencies: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(emergencies))
}

/// GET /api/emergencias/{id} - Get emergency by ID
#[utoipa::path(
    get,
    path = "/api/emergencias/{id}",
    params(
        ("id" = i32, Path, description = "Emergency ID")
    ),
    responses(
        (status = 200, description = "Emergency found", body = Emergency),
        (status = 404, description = "Emergency not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn get_emergency(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Emergency>, StatusCode> {
    let emergency = state
        .service
        .get(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get emergency: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(emergency))
}

/// GET /api/emergencias/sala/{id_sala} - List emergencies for a room
#[utoipa::path(
    get,
    path = "/api/emergencias/sala/{id_sala}",
    params(
        ("id_sala" = i32, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Emergencies for the room, newest first", body = Vec<Emergency>),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn list_emergencies_by_room(
    State(state): State<AppState>,
    Path(id_sala): Path<i32>,
) -> Result<Json<Vec<Emergency>>, StatusCode> {
    let emergencies = state.service.list_by_room(id_sala).await.map_err(|e| {
        tracing::error!("Failed to list emergencies by room: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(emergencies))
}

/// GET /api/emergencias/periodo - List emergencies in a date range
#[utoipa::path(
    get,
    path = "/api/emergencias/periodo",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Emergencies within the range, newest first", body = Vec<Emergency>),
        (status = 400, description = "Missing or malformed date bound"),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn list_emergencies_by_period(
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<Emergency>>, StatusCode> {
    let emergencies = state
        .service
        .list_between(period.start, period.end)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list emergencies by period: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(emergencies))
}

/// GET /api/emergencias/recentes - List emergencies from the last 24 hours
#[utoipa::path(
    get,
    path = "/api/emergencias/recentes",
    responses(
        (status = 200, description = "Emergencies from the last 24 hours, newest first", body = Vec<Emergency>),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn list_recent_emergencies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Emergency>>, StatusCode> {
    let emergencies = state.service.list_recent().await.map_err(|e| {
        tracing::error!("Failed to list recent emergencies: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(emergencies))
}

/// PUT /api/emergencias/{id} - Update emergency
#[utoipa::path(
    put,
    path = "/api/emergencias/{id}",
    params(
        ("id" = i32, Path, description = "Emergency ID")
    ),
    request_body = UpdateEmergencyRequest,
    responses(
        (status = 200, description = "Emergency updated", body = Emergency),
        (status = 400, description = "Missing or malformed field"),
        (status = 404, description = "Emergency not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn update_emergency(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateEmergencyRequest>,
) -> Result<Json<Emergency>, StatusCode> {
    let emergency = state
        .service
        .update(id, req)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update emergency: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(emergency))
}

/// DELETE /api/emergencias/{id} - Delete emergency
#[utoipa::path(
    delete,
    path = "/api/emergencias/{id}",
    params(
        ("id" = i32, Path, description = "Emergency ID")
    ),
    responses(
        (status = 204, description = "Emergency deleted"),
        (status = 404, description = "Emergency not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn delete_emergency(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let deleted = state.service.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete emergency: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// GET /api/emergencias/sala/{id_sala}/contagem - Count emergencies for a room
#[utoipa::path(
    get,
    path = "/api/emergencias/sala/{id_sala}/contagem",
    params(
        ("id_sala" = i32, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Number of emergencies recorded for the room", body = i64),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn count_emergencies_by_room(
    State(state): State<AppState>,
    Path(id_sala): Path<i32>,
) -> Result<Json<i64>, StatusCode> {
    let count = state.service.count_by_room(id_sala).await.map_err(|e| {
        tracing::error!("Failed to count emergencies by room: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(count))
}

/// GET /api/emergencias/sala/{id_sala}/ultima - Latest emergencies for a room
#[utoipa::path(
    get,
    path = "/api/emergencias/sala/{id_sala}/ultima",
    params(
        ("id_sala" = i32, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Full descending history for the room; clients take the first element", body = Vec<Emergency>),
        (status = 500, description = "Internal server error")
    ),
    tag = "emergencias"
)]
pub async fn latest_emergency_by_room(
    State(state): State<AppState>,
    Path(id_sala): Path<i32>,
) -> Result<Json<Vec<Emergency>>, StatusCode> {
    let emergencies = state.service.latest_by_room(id_sala).await.map_err(|e| {
        tracing::error!("Failed to get latest emergency by room: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(emergencies))
}

/// GET /api/emergencias/health - Liveness probe for the dashboard
#[utoipa::path(
    get,
    path = "/api/emergencias/health",
    responses(
        (status = 200, description = "Service is up", body = String)
    ),
    tag = "emergencias"
)]
pub async fn health() -> &'static str {
    "API de Emergências funcionando normalmente!"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    #[test]
    fn test_create_request_requires_room_id() {
        let missing = serde_json::from_value::<CreateEmergencyRequest>(json!({
            "data": "2026-08-07T12:00:00Z"
        }));
        assert!(missing.is_err());

        let ok = serde_json::from_value::<CreateEmergencyRequest>(json!({
            "idSala": 7
        }))
        .unwrap();
        assert_eq!(ok.room_id, 7);
        assert!(ok.occurred_at.is_none());
    }

    #[test]
    fn test_create_request_ignores_body_id() {
        // An idEmergencia in the body is unknown to the DTO and dropped.
        let req = serde_json::from_value::<CreateEmergencyRequest>(json!({
            "idEmergencia": 99,
            "idSala": 7,
            "data": "2026-08-07T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(req.room_id, 7);
        assert!(req.occurred_at.is_some());
    }

    #[test]
    fn test_update_request_with_absent_data_is_none() {
        let req = serde_json::from_value::<UpdateEmergencyRequest>(json!({
            "idSala": 3
        }))
        .unwrap();
        assert_eq!(req.room_id, 3);
        assert!(req.occurred_at.is_none());
    }

    #[test]
    fn test_period_query_field_names() {
        let query = serde_json::from_value::<PeriodQuery>(json!({
            "dataInicio": "2026-08-01T00:00:00Z",
            "dataFim": "2026-08-07T00:00:00Z"
        }))
        .unwrap();
        assert!(query.start < query.end);

        let missing_end = serde_json::from_value::<PeriodQuery>(json!({
            "dataInicio": "2026-08-01T00:00:00Z"
        }));
        assert!(missing_end.is_err());
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = Router::new().route("/api/emergencias/health", get(health));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/emergencias/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], "API de Emergências funcionando normalmente!".as_bytes());
    }
}
