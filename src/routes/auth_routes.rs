use axum::{extract::State, routing::get, routing::post, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::middleware::auth::AuthUser;
use crate::models::auth::{LoginRequest, LoginResponse, UserInfo};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone());
    let response = controller.login(&state.jwt, request).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserInfo>, AppError> {
    let controller = AuthController::new(state.pool.clone());
    Ok(Json(controller.me(user)))
}
