use crate::models::service_type::ServiceType;
use crate::services::scheduling_service::CalendarDay;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// Query del calendario mensual
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub month: u32,
    pub year: i32,
}

// Query de franjas horarias de un día (fecha como YYYY-MM-DD)
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

// Query de recomendación de paquete
#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub vehicle_id: i64,
}

// Response del calendario: grilla lunes-primero con celdas de relleno
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: u32,
    pub year: i32,
    pub grid: Vec<Option<CalendarDay>>,
}

// Response de franjas horarias disponibles
#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<NaiveTime>,
}

// Response de recomendación según kilometraje
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub vehicle_id: i64,
    pub current_mileage_km: i32,
    pub recommended: Option<ServiceType>,
}
