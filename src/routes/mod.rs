pub mod appointment_routes;
pub mod auth_routes;
pub mod booking_routes;
pub mod catalog_routes;
pub mod maintenance_routes;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;

/// Construye el router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    // En desarrollo el CORS es permisivo; fuera de desarrollo se limita
    // a los orígenes configurados
    let cors = if state.config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/catalog", catalog_routes::create_catalog_router())
        .nest("/api/booking", booking_routes::create_booking_router())
        .nest(
            "/api/appointments",
            appointment_routes::create_appointment_router()
                .merge(maintenance_routes::create_maintenance_router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "service-center-backend"
    }))
}
