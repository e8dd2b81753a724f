use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::catalog_controller::CatalogController;
use crate::models::part::Part;
use crate::models::service_center::ServiceCenter;
use crate::models::service_type::ServiceType;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/service-types", get(list_service_types))
        .route("/service-centers", get(list_service_centers))
        .route("/parts", get(list_parts))
        .route("/parts/:id/inventory", get(part_inventory))
}

async fn list_service_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceType>>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    Ok(Json(controller.list_service_types().await?))
}

async fn list_service_centers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceCenter>>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    Ok(Json(controller.list_service_centers().await?))
}

async fn list_parts(State(state): State<AppState>) -> Result<Json<Vec<Part>>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    Ok(Json(controller.list_parts().await?))
}

async fn part_inventory(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = CatalogController::new(state.pool.clone());
    let (part, quantity) = controller.part_inventory(id).await?;
    Ok(Json(serde_json::json!({
        "part_id": part.id,
        "name": part.name,
        "inventory_quantity": quantity,
        "min_stock_level": part.min_stock_level,
        "below_min_stock": part.is_below_min_stock(),
    })))
}
