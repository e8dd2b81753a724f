//! Coordinador de asignación de técnicos
//!
//! Adjunta o reemplaza el conjunto de técnicos vinculados a una cita.
//! No hay primitivas de alta/baja individuales: reinvocar con un conjunto
//! distinto es la forma de editar la asignación.

use crate::models::appointment::{AppointmentStatus, AssignedTechnician};
use crate::models::auth::{UserInfo, UserRole};
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

/// Resultado de una asignación aplicada
#[derive(Debug)]
pub struct AssignmentResult {
    pub appointment_id: i64,
    pub technicians: Vec<AssignedTechnician>,
}

pub struct AssignmentService {
    repository: AppointmentRepository,
}

impl AssignmentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AppointmentRepository::new(pool),
        }
    }

    /// Reemplaza (no fusiona) el conjunto de técnicos asignados a la cita.
    /// Solo tiene sentido con la cita aceptada o en curso.
    pub async fn assign(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
        technician_ids: &[i64],
        notes: Option<&str>,
    ) -> AppResult<AssignmentResult> {
        if ctx.role != UserRole::Staff {
            return Err(AppError::Forbidden(
                "Solo el staff puede asignar técnicos".to_string(),
            ));
        }

        if technician_ids.is_empty() {
            return Err(AppError::Validation(
                "Debe asignarse al menos un técnico".to_string(),
            ));
        }

        let appointment = self
            .repository
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| not_found_error("Appointment", appointment_id))?;

        if ctx.service_center_id != Some(appointment.service_center_id) {
            return Err(AppError::Forbidden(
                "La cita pertenece a otro centro de servicio".to_string(),
            ));
        }

        if !matches!(
            appointment.status,
            AppointmentStatus::Accepted | AppointmentStatus::InProgress
        ) {
            return Err(AppError::Validation(format!(
                "Los técnicos solo se asignan con la cita aceptada o en curso (estado actual '{}')",
                appointment.status.as_str()
            )));
        }

        let technicians = self
            .repository
            .replace_technicians(appointment_id, technician_ids, notes)
            .await?;

        info!(
            "👷 Cita {}: conjunto de técnicos reemplazado por {:?} (staff {})",
            appointment_id, technician_ids, ctx.id
        );

        Ok(AssignmentResult {
            appointment_id,
            technicians,
        })
    }

    /// Técnicos asignados a una cita. Una cita sin técnicos es un estado
    /// válido: degrada a lista vacía, nunca a error.
    pub async fn technicians_for(
        &self,
        appointment_id: i64,
    ) -> AppResult<Vec<AssignedTechnician>> {
        self.repository.find_technicians(appointment_id).await
    }
}
