use crate::models::part::Part;
use crate::models::service_center::ServiceCenter;
use crate::models::service_type::ServiceType;
use crate::repositories::part_repository::PartRepository;
use crate::repositories::service_center_repository::ServiceCenterRepository;
use crate::repositories::service_type_repository::ServiceTypeRepository;
use crate::utils::errors::{not_found_error, AppResult};
use sqlx::PgPool;

pub struct CatalogController {
    service_type_repository: ServiceTypeRepository,
    service_center_repository: ServiceCenterRepository,
    part_repository: PartRepository,
}

impl CatalogController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service_type_repository: ServiceTypeRepository::new(pool.clone()),
            service_center_repository: ServiceCenterRepository::new(pool.clone()),
            part_repository: PartRepository::new(pool),
        }
    }

    /// Tipos de servicio ordenados por precio ascendente
    pub async fn list_service_types(&self) -> AppResult<Vec<ServiceType>> {
        self.service_type_repository.find_all().await
    }

    pub async fn list_service_centers(&self) -> AppResult<Vec<ServiceCenter>> {
        self.service_center_repository.find_all().await
    }

    pub async fn list_parts(&self) -> AppResult<Vec<Part>> {
        self.part_repository.find_all().await
    }

    /// Stock actual de una pieza, junto con su umbral mínimo
    pub async fn part_inventory(&self, part_id: i64) -> AppResult<(Part, i32)> {
        let part = self
            .part_repository
            .find_by_id(part_id)
            .await?
            .ok_or_else(|| not_found_error("Part", part_id))?;
        let quantity = self.part_repository.get_inventory_quantity(part_id).await?;
        Ok((part, quantity))
    }
}
