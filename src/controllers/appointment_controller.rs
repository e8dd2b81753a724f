use crate::dto::appointment_dto::{
    AssignTechniciansRequest, AssignmentResponse, TransitionRequest, TransitionResponse,
};
use crate::models::appointment::{Appointment, AppointmentStatus, AssignedTechnician};
use crate::models::auth::{UserInfo, UserRole};
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::services::appointment_service::AppointmentService;
use crate::services::assignment_service::AssignmentService;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use sqlx::PgPool;
use validator::Validate;

pub struct AppointmentController {
    repository: AppointmentRepository,
    appointment_service: AppointmentService,
    assignment_service: AssignmentService,
}

impl AppointmentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AppointmentRepository::new(pool.clone()),
            appointment_service: AppointmentService::new(pool.clone()),
            assignment_service: AssignmentService::new(pool),
        }
    }

    /// Citas visibles para el actor según su rol: el cliente ve las suyas,
    /// staff y manager las de su centro, el técnico las que tiene asignadas.
    pub async fn list(&self, ctx: &UserInfo) -> AppResult<Vec<Appointment>> {
        match ctx.role {
            UserRole::Customer => self.repository.list_for_customer(ctx.id).await,
            UserRole::Staff | UserRole::Manager => {
                let center_id = ctx.service_center_id.ok_or_else(|| {
                    AppError::Validation(
                        "El usuario no tiene centro de servicio asignado".to_string(),
                    )
                })?;
                self.repository.list_for_center(center_id).await
            }
            UserRole::Technician => self.repository.list_for_technician(ctx.id).await,
        }
    }

    pub async fn get_by_id(&self, ctx: &UserInfo, id: i64) -> AppResult<Appointment> {
        let appointment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Appointment", id))?;

        match ctx.role {
            UserRole::Customer => {
                if appointment.customer_id != ctx.id {
                    return Err(AppError::Forbidden(
                        "La cita pertenece a otro cliente".to_string(),
                    ));
                }
            }
            UserRole::Staff | UserRole::Technician | UserRole::Manager => {
                if ctx.service_center_id != Some(appointment.service_center_id) {
                    return Err(AppError::Forbidden(
                        "La cita pertenece a otro centro de servicio".to_string(),
                    ));
                }
            }
        }

        Ok(appointment)
    }

    pub async fn transition(
        &self,
        ctx: &UserInfo,
        id: i64,
        request: TransitionRequest,
    ) -> AppResult<TransitionResponse> {
        let target = AppointmentStatus::from_str(&request.target_status).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Estado de cita desconocido: '{}'",
                request.target_status
            ))
        })?;

        let outcome = self.appointment_service.transition(ctx, id, target).await?;
        Ok(TransitionResponse {
            appointment: outcome.appointment,
            warning: outcome.warning,
        })
    }

    pub async fn assign_technicians(
        &self,
        ctx: &UserInfo,
        id: i64,
        request: AssignTechniciansRequest,
    ) -> AppResult<AssignmentResponse> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let result = self
            .assignment_service
            .assign(ctx, id, &request.technician_ids, request.notes.as_deref())
            .await?;

        Ok(AssignmentResponse {
            appointment_id: result.appointment_id,
            technicians: result.technicians,
        })
    }

    pub async fn technicians(&self, ctx: &UserInfo, id: i64) -> AppResult<Vec<AssignedTechnician>> {
        // El chequeo de acceso es el mismo que para leer la cita
        let _ = self.get_by_id(ctx, id).await?;
        self.assignment_service.technicians_for(id).await
    }
}
