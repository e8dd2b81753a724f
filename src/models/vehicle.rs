//! Modelo de Vehicle
//!
//! Vehículo de un cliente. El kilometraje alimenta la recomendación
//! de paquete del flujo de reserva.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub customer_id: i64,
    pub license_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub current_mileage_km: i32,
    pub created_at: DateTime<Utc>,
}
