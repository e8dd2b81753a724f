use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    CalendarQuery, CalendarResponse, RecommendationQuery, RecommendationResponse, SlotsQuery,
    SlotsResponse,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthUser;
use crate::models::appointment::Appointment;
use crate::models::vehicle::Vehicle;
use crate::services::booking_service::CreateAppointmentRequest;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(calendar))
        .route("/slots", get(slots))
        .route("/recommendation", get(recommendation))
        .route("/vehicles", get(my_vehicles))
        .route("/appointments", post(submit_appointment))
}

async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.calendar(query)?))
}

async fn slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.slots(query)?))
}

async fn recommendation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.recommendation(&user, query).await?))
}

async fn my_vehicles(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.my_vehicles(&user).await?))
}

async fn submit_appointment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let appointment = controller.submit(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        appointment,
        "Cita creada exitosamente".to_string(),
    )))
}
