use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::appointment_controller::AppointmentController;
use crate::dto::appointment_dto::{
    AssignTechniciansRequest, AssignmentResponse, TransitionRequest, TransitionResponse,
};
use crate::middleware::auth::AuthUser;
use crate::models::appointment::{Appointment, AssignedTechnician};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments))
        .route("/:id", get(get_appointment))
        .route("/:id/transition", post(transition_appointment))
        .route("/:id/technicians", get(list_technicians))
        .route("/:id/technicians", put(assign_technicians))
}

async fn list_appointments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let controller = AppointmentController::new(state.pool.clone());
    Ok(Json(controller.list(&user).await?))
}

async fn get_appointment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let controller = AppointmentController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&user, id).await?))
}

async fn transition_appointment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let controller = AppointmentController::new(state.pool.clone());
    Ok(Json(controller.transition(&user, id, request).await?))
}

async fn list_technicians(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<AssignedTechnician>>, AppError> {
    let controller = AppointmentController::new(state.pool.clone());
    Ok(Json(controller.technicians(&user, id).await?))
}

async fn assign_technicians(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<AssignTechniciansRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let controller = AppointmentController::new(state.pool.clone());
    Ok(Json(
        controller.assign_technicians(&user, id, request).await?,
    ))
}
