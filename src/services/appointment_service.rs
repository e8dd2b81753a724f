//! Máquina de estados de citas
//!
//! Define las transiciones válidas entre estados de una cita y el rol
//! requerido para disparar cada una. Las transiciones son monótonas:
//! ningún estado terminal admite una transición posterior.
//!
//! La fila devuelta por cada transición es la releída del servidor, de modo
//! que el llamador siempre reconcilia su estado local con la fuente de
//! verdad, haya o no tenido éxito una petición concurrente.

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::auth::{UserInfo, UserRole};
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use sqlx::PgPool;
use tracing::{info, warn};

/// Resultado de una transición aplicada: la fila autoritativa releída
/// y una advertencia opcional (p.ej. completar sin registro guardado).
#[derive(Debug)]
pub struct TransitionOutcome {
    pub appointment: Appointment,
    pub warning: Option<String>,
}

/// Valida una transición de estado según la tabla de roles.
///
/// `is_assigned_technician` indica si el actor técnico pertenece al
/// conjunto de técnicos asignados de la cita.
pub fn validate_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
    role: UserRole,
    is_assigned_technician: bool,
) -> AppResult<()> {
    // Ningún estado terminal se revive
    if from.is_terminal() {
        return Err(AppError::InvalidTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }

    match (from, to) {
        (AppointmentStatus::Pending, AppointmentStatus::Accepted) => match role {
            UserRole::Staff => Ok(()),
            _ => Err(AppError::Forbidden(
                "Solo el staff puede aceptar una cita pendiente".to_string(),
            )),
        },

        (AppointmentStatus::Accepted, AppointmentStatus::InProgress) => match role {
            UserRole::Staff => Ok(()),
            UserRole::Technician if is_assigned_technician => Ok(()),
            UserRole::Technician => Err(AppError::Forbidden(
                "El técnico no está asignado a esta cita".to_string(),
            )),
            _ => Err(AppError::Forbidden(
                "Solo staff o el técnico asignado pueden iniciar el trabajo".to_string(),
            )),
        },

        (AppointmentStatus::InProgress, AppointmentStatus::Completed) => match role {
            UserRole::Technician if is_assigned_technician => Ok(()),
            UserRole::Technician => Err(AppError::Forbidden(
                "El técnico no está asignado a esta cita".to_string(),
            )),
            _ => Err(AppError::Forbidden(
                "Solo el técnico asignado puede completar el trabajo".to_string(),
            )),
        },

        // Cancelación desde cualquier estado no terminal
        (_, AppointmentStatus::Cancelled) => match role {
            UserRole::Staff => Ok(()),
            _ => Err(AppError::Forbidden(
                "Solo el staff puede cancelar una cita".to_string(),
            )),
        },

        _ => Err(AppError::InvalidTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        }),
    }
}

/// Servicio de citas: aplica transiciones contra la base de datos
pub struct AppointmentService {
    repository: AppointmentRepository,
    maintenance_repository: MaintenanceRepository,
}

impl AppointmentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AppointmentRepository::new(pool.clone()),
            maintenance_repository: MaintenanceRepository::new(pool),
        }
    }

    /// Aplica una transición de estado. Las fallas de red o de permisos se
    /// devuelven al llamador sin reintentos; el estado devuelto en éxito es
    /// el releído del servidor (last-write-wins ante peticiones concurrentes).
    pub async fn transition(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
        target: AppointmentStatus,
    ) -> AppResult<TransitionOutcome> {
        let appointment = self
            .repository
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| not_found_error("Appointment", appointment_id))?;

        // Staff y técnicos solo operan sobre citas de su propio centro
        if matches!(ctx.role, UserRole::Staff | UserRole::Technician)
            && ctx.service_center_id != Some(appointment.service_center_id)
        {
            return Err(AppError::Forbidden(
                "La cita pertenece a otro centro de servicio".to_string(),
            ));
        }

        let is_assigned = if ctx.role == UserRole::Technician {
            self.repository
                .is_technician_assigned(appointment_id, ctx.id)
                .await?
        } else {
            false
        };

        validate_transition(appointment.status, target, ctx.role, is_assigned)?;

        // Completar sin registro de mantenimiento guardado es una
        // advertencia, no un error
        let warning = if target == AppointmentStatus::Completed {
            let record = self
                .maintenance_repository
                .find_by_appointment(appointment_id)
                .await?;
            if record.is_none() {
                warn!(
                    "⚠️ Cita {} completada sin registro de mantenimiento guardado",
                    appointment_id
                );
                Some(
                    "La cita se completó sin un registro de mantenimiento guardado".to_string(),
                )
            } else {
                None
            }
        } else {
            None
        };

        let updated = self
            .repository
            .update_status(appointment_id, target)
            .await?;

        info!(
            "🔄 Cita {} pasó de '{}' a '{}' (actor {} rol {})",
            appointment_id,
            appointment.status.as_str(),
            updated.status.as_str(),
            ctx.id,
            ctx.role.as_str()
        );

        Ok(TransitionOutcome {
            appointment: updated,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Accepted,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    #[test]
    fn test_staff_accepts_pending() {
        assert!(validate_transition(
            AppointmentStatus::Pending,
            AppointmentStatus::Accepted,
            UserRole::Staff,
            false
        )
        .is_ok());
    }

    #[test]
    fn test_customer_cannot_accept() {
        let err = validate_transition(
            AppointmentStatus::Pending,
            AppointmentStatus::Accepted,
            UserRole::Customer,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_staff_cancels_any_non_terminal() {
        for from in [
            AppointmentStatus::Pending,
            AppointmentStatus::Accepted,
            AppointmentStatus::InProgress,
        ] {
            assert!(validate_transition(
                from,
                AppointmentStatus::Cancelled,
                UserRole::Staff,
                false
            )
            .is_ok());
        }
    }

    #[test]
    fn test_assigned_technician_starts_and_completes() {
        assert!(validate_transition(
            AppointmentStatus::Accepted,
            AppointmentStatus::InProgress,
            UserRole::Technician,
            true
        )
        .is_ok());
        assert!(validate_transition(
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            UserRole::Technician,
            true
        )
        .is_ok());
    }

    #[test]
    fn test_unassigned_technician_is_forbidden() {
        let err = validate_transition(
            AppointmentStatus::Accepted,
            AppointmentStatus::InProgress,
            UserRole::Technician,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_staff_cannot_complete() {
        let err = validate_transition(
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            UserRole::Staff,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_terminal_states_are_monotonic() {
        // Desde un estado terminal toda transición falla con
        // InvalidTransition sin importar el actor
        for from in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
            for to in ALL_STATUSES {
                for role in [
                    UserRole::Customer,
                    UserRole::Staff,
                    UserRole::Technician,
                    UserRole::Manager,
                ] {
                    let err = validate_transition(from, to, role, true).unwrap_err();
                    assert!(
                        matches!(err, AppError::InvalidTransition { .. }),
                        "{:?} -> {:?} como {:?}",
                        from,
                        to,
                        role
                    );
                }
            }
        }
    }

    #[test]
    fn test_skipping_states_is_invalid() {
        let err = validate_transition(
            AppointmentStatus::Pending,
            AppointmentStatus::Completed,
            UserRole::Technician,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        let err = validate_transition(
            AppointmentStatus::Pending,
            AppointmentStatus::InProgress,
            UserRole::Staff,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }
}
