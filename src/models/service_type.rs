//! Modelo de ServiceType
//!
//! Paquete de mantenimiento comprable, con precio, duración estimada y
//! una descripción textual de la que se deriva el checklist.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Categorías de paquete con exclusividad mutua entre tiers
pub const CATEGORY_BASIC: &str = "basic";
pub const CATEGORY_STANDARD: &str = "standard";
pub const CATEGORY_PREMIUM: &str = "premium";

/// ServiceType principal - mapea a la tabla service_types
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceType {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub duration_estimate_minutes: i32,
}

impl ServiceType {
    /// Tier premium del paquete
    pub fn is_premium(&self) -> bool {
        self.category.as_deref() == Some(CATEGORY_PREMIUM)
    }

    /// Tier básico o estándar del paquete
    pub fn is_basic_or_standard(&self) -> bool {
        matches!(
            self.category.as_deref(),
            Some(CATEGORY_BASIC) | Some(CATEGORY_STANDARD)
        )
    }
}
