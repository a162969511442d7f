// Alerta API server
// Decision: plain constructor wiring (Database -> EmergencyService -> router state)

mod emergencies;
mod services;

use alerta_storage::Database;
use anyhow::{Context, Result};
use axum::http::Method;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        emergencies::create_emergency,
        emergencies::list_emergencies,
        emergencies::get_emergency,
        emergencies::list_emergencies_by_room,
        emergencies::list_emergencies_by_period,
        emergencies::list_recent_emergencies,
        emergencies::update_emergency,
        emergencies::delete_emergency,
        emergencies::count_emergencies_by_room,
        emergencies::latest_emergency_by_room,
        emergencies::health,
    ),
    components(
        schemas(
            alerta_core::Emergency,
            emergencies::CreateEmergencyRequest,
            emergencies::UpdateEmergencyRequest,
        )
    ),
    tags(
        (name = "emergencias", description = "Emergency record endpoints")
    ),
    info(
        title = "Alerta API",
        version = "0.1.0",
        description = "Record-keeping API for room emergency events",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alerta_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("alerta-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    let state = emergencies::AppState::new(Arc::new(db));

    // The monitoring dashboard is served from a different origin, so
    // requests are accepted from anywhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let app = Router::new()
        .merge(emergencies::routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
