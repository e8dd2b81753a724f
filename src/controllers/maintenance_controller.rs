use crate::dto::maintenance_dto::{SaveRecordResponse, ToggleItemRequest, ToggleItemResponse};
use crate::models::auth::UserInfo;
use crate::models::maintenance::MaintenanceRecord;
use crate::services::maintenance_service::{
    MaintenanceService, SaveMaintenanceRecordRequest, ToggleField,
};
use crate::utils::errors::{AppError, AppResult};
use sqlx::PgPool;

pub struct MaintenanceController {
    service: MaintenanceService,
}

impl MaintenanceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: MaintenanceService::new(pool),
        }
    }

    pub async fn get_record(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
    ) -> AppResult<Option<MaintenanceRecord>> {
        self.service.get_record(ctx, appointment_id).await
    }

    pub async fn save_record(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
        request: SaveMaintenanceRecordRequest,
    ) -> AppResult<SaveRecordResponse> {
        let outcome = self.service.save_record(ctx, appointment_id, request).await?;
        Ok(SaveRecordResponse {
            record: outcome.record,
            replacement_alerts: outcome.replacement_alerts,
            adjustments_applied: outcome.adjustments_applied,
            created: outcome.created,
        })
    }

    pub async fn toggle_item(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
        index: usize,
        request: ToggleItemRequest,
    ) -> AppResult<ToggleItemResponse> {
        let field = match request.field.as_str() {
            "completed" => ToggleField::Completed,
            "needs_replacement" => ToggleField::NeedsReplacement,
            other => {
                return Err(AppError::BadRequest(format!(
                    "Campo de toggle desconocido: '{}'",
                    other
                )))
            }
        };

        let (record, replacement_alert) = self
            .service
            .toggle_item(ctx, appointment_id, index, field)
            .await?;

        Ok(ToggleItemResponse {
            record,
            replacement_alert,
        })
    }
}
