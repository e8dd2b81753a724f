//! Repositorio del catálogo de tipos de servicio

use crate::models::service_type::ServiceType;
use crate::utils::errors::AppResult;
use sqlx::PgPool;

pub struct ServiceTypeRepository {
    pool: PgPool,
}

impl ServiceTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> AppResult<Vec<ServiceType>> {
        let service_types =
            sqlx::query_as::<_, ServiceType>("SELECT * FROM service_types ORDER BY price")
                .fetch_all(&self.pool)
                .await?;
        Ok(service_types)
    }

    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<ServiceType>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let service_types =
            sqlx::query_as::<_, ServiceType>("SELECT * FROM service_types WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(service_types)
    }
}
