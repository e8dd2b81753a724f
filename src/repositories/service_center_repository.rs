//! Repositorio de centros de servicio

use crate::models::service_center::ServiceCenter;
use crate::utils::errors::AppResult;
use sqlx::PgPool;

pub struct ServiceCenterRepository {
    pool: PgPool,
}

impl ServiceCenterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> AppResult<Vec<ServiceCenter>> {
        let centers =
            sqlx::query_as::<_, ServiceCenter>("SELECT * FROM service_centers ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(centers)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceCenter>> {
        let center = sqlx::query_as::<_, ServiceCenter>(
            "SELECT * FROM service_centers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(center)
    }
}
