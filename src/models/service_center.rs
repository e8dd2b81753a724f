//! Modelo de ServiceCenter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// ServiceCenter principal - mapea a la tabla service_centers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceCenter {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}
