use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::common::ApiResponse;
use crate::dto::maintenance_dto::{SaveRecordResponse, ToggleItemRequest, ToggleItemResponse};
use crate::middleware::auth::AuthUser;
use crate::models::maintenance::MaintenanceRecord;
use crate::services::maintenance_service::SaveMaintenanceRecordRequest;
use crate::state::AppState;
use crate::utils::errors::AppError;

// Estas rutas se montan bajo /api/appointments junto a las rutas de citas
pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/:id/maintenance-record", get(get_record))
        .route("/:id/maintenance-record", put(save_record))
        .route(
            "/:id/maintenance-record/items/:index/toggle",
            post(toggle_item),
        )
}

async fn get_record(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Option<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    Ok(Json(controller.get_record(&user, id).await?))
}

async fn save_record(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<SaveMaintenanceRecordRequest>,
) -> Result<Json<ApiResponse<SaveRecordResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.save_record(&user, id, request).await?;
    let message = if response.created {
        "Registro de mantenimiento creado exitosamente"
    } else {
        "Registro de mantenimiento actualizado exitosamente"
    };
    Ok(Json(ApiResponse::success_with_message(
        response,
        message.to_string(),
    )))
}

async fn toggle_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, index)): Path<(i64, usize)>,
    Json(request): Json<ToggleItemRequest>,
) -> Result<Json<ToggleItemResponse>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    Ok(Json(
        controller.toggle_item(&user, id, index, request).await?,
    ))
}
