//! Repositorio del catálogo de piezas e inventario compartido
//!
//! Implementa el colaborador InventoryStore con una actualización
//! condicional: el stock nunca queda negativo; un consumo sin stock
//! suficiente falla con Conflict en lugar de sobreescribir.

use crate::models::part::{AdjustmentDirection, Part};
use crate::services::inventory_service::InventoryStore;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PartRepository {
    pool: PgPool,
}

impl PartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Part>> {
        let parts = sqlx::query_as::<_, Part>("SELECT * FROM parts ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(parts)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Part>> {
        let part = sqlx::query_as::<_, Part>("SELECT * FROM parts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(part)
    }

    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Part>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let parts = sqlx::query_as::<_, Part>("SELECT * FROM parts WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(parts)
    }

    pub async fn get_inventory_quantity(&self, part_id: i64) -> AppResult<i32> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT inventory_quantity FROM parts WHERE id = $1")
                .bind(part_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| r.0)
            .ok_or_else(|| not_found_error("Part", part_id))
    }
}

#[async_trait]
impl InventoryStore for PartRepository {
    async fn update_inventory_quantity(
        &self,
        part_id: i64,
        magnitude: i64,
        direction: AdjustmentDirection,
    ) -> AppResult<()> {
        let magnitude = i32::try_from(magnitude).map_err(|_| {
            AppError::Validation(format!(
                "Magnitud de ajuste fuera de rango para la pieza {}",
                part_id
            ))
        })?;

        let result = match direction {
            AdjustmentDirection::ConsumeFromStock => {
                sqlx::query(
                    r#"
                    UPDATE parts
                    SET inventory_quantity = inventory_quantity - $2
                    WHERE id = $1 AND inventory_quantity >= $2
                    "#,
                )
                .bind(part_id)
                .bind(magnitude)
                .execute(&self.pool)
                .await?
            }
            AdjustmentDirection::ReturnToStock => {
                sqlx::query("UPDATE parts SET inventory_quantity = inventory_quantity + $2 WHERE id = $1")
                    .bind(part_id)
                    .bind(magnitude)
                    .execute(&self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            // Distinguir pieza inexistente de stock insuficiente
            return match self.find_by_id(part_id).await? {
                None => Err(not_found_error("Part", part_id)),
                Some(part) => Err(AppError::Conflict(format!(
                    "Stock insuficiente para la pieza {} (disponible {}, requerido {})",
                    part_id, part.inventory_quantity, magnitude
                ))),
            };
        }

        Ok(())
    }
}
