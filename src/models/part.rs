//! Modelo de Part
//!
//! Pieza del catálogo de inventario. inventory_quantity es el stock
//! compartido entre todos los técnicos que consumen la misma pieza.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Part principal - mapea a la tabla parts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Part {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub min_stock_level: i32,
    pub inventory_quantity: i32,
}

impl Part {
    /// Indica si el stock está por debajo del mínimo configurado
    pub fn is_below_min_stock(&self) -> bool {
        self.inventory_quantity < self.min_stock_level
    }
}

/// Dirección de un ajuste de inventario
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    /// Consumir stock (más piezas usadas que antes)
    ConsumeFromStock,
    /// Devolver stock (un uso previamente registrado se redujo)
    ReturnToStock,
}

/// Instrucción de ajuste de inventario emitida por el reconciliador
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryAdjustment {
    pub part_id: i64,
    pub magnitude: i64,
    pub direction: AdjustmentDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_min_stock() {
        let part = Part {
            id: 1,
            name: "Filtro de aceite".to_string(),
            description: None,
            unit_price: Decimal::from(12),
            min_stock_level: 5,
            inventory_quantity: 3,
        };
        assert!(part.is_below_min_stock());
    }
}
