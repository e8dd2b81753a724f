//! Orquestador del flujo de reserva
//!
//! Conduce la secuencia fija de cinco pasos del asistente de reserva
//! (Vehículo → Sucursal → Servicios → Agenda → Contacto), calcula el
//! paquete recomendado según el kilometraje y compone la petición final
//! de creación de cita. Toda validación ocurre antes de persistir.

use crate::models::appointment::Appointment;
use crate::models::auth::{UserInfo, UserRole};
use crate::models::service_type::ServiceType;
use crate::repositories::appointment_repository::{AppointmentRepository, NewAppointment};
use crate::repositories::service_type_repository::ServiceTypeRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::scheduling_service::{is_time_slot_in_past, is_within_booking_window};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

/// Pasos del asistente de reserva, en orden fijo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Vehicle,
    Branch,
    Services,
    Schedule,
    Contact,
}

impl BookingStep {
    pub const ALL: [BookingStep; 5] = [
        BookingStep::Vehicle,
        BookingStep::Branch,
        BookingStep::Services,
        BookingStep::Schedule,
        BookingStep::Contact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BookingStep::Vehicle => "vehículo",
            BookingStep::Branch => "sucursal",
            BookingStep::Services => "servicios",
            BookingStep::Schedule => "agenda",
            BookingStep::Contact => "contacto",
        }
    }
}

/// Estado acumulado del asistente de reserva
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingDraft {
    pub vehicle_id: Option<i64>,
    pub service_center_id: Option<i64>,
    #[serde(default)]
    pub service_type_ids: Vec<i64>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
}

/// Validez de un paso individual del asistente
pub fn is_step_valid(
    draft: &BookingDraft,
    step: BookingStep,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> bool {
    match step {
        BookingStep::Vehicle => draft.vehicle_id.is_some(),
        BookingStep::Branch => draft.service_center_id.is_some(),
        BookingStep::Services => !draft.service_type_ids.is_empty(),
        BookingStep::Schedule => match (draft.date, draft.time) {
            (Some(date), Some(time)) => {
                is_within_booking_window(date, today) && !is_time_slot_in_past(time, date, now)
            }
            _ => false,
        },
        BookingStep::Contact => {
            let filled = |v: &Option<String>| {
                v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
            };
            filled(&draft.contact_name) && filled(&draft.contact_phone)
        }
    }
}

/// Primer paso inválido del borrador, si lo hay
pub fn first_invalid_step(
    draft: &BookingDraft,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Option<BookingStep> {
    BookingStep::ALL
        .into_iter()
        .find(|step| !is_step_valid(draft, *step, today, now))
}

/// Avanzar a un paso exige que todos los anteriores sean válidos
pub fn can_advance_to(
    draft: &BookingDraft,
    target: BookingStep,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> bool {
    BookingStep::ALL
        .into_iter()
        .take_while(|step| *step != target)
        .all(|step| is_step_valid(draft, step, today, now))
}

/// Paquete recomendado según el kilometraje del vehículo.
///
/// Las bandas de kilometraje (≤5k / 5–10k / 10–15k / 15–20k / >20k)
/// seleccionan el más barato, uno de precio medio o el más caro de los
/// tipos de servicio ordenados por precio ascendente.
pub fn recommend_package(mileage_km: i32, service_types: &[ServiceType]) -> Option<&ServiceType> {
    if service_types.is_empty() {
        return None;
    }

    let mut sorted: Vec<&ServiceType> = service_types.iter().collect();
    sorted.sort_by(|a, b| a.price.cmp(&b.price));

    let index = match mileage_km {
        m if m <= 5_000 => 0,
        m if m <= 10_000 => sorted.len() / 2,
        m if m <= 15_000 => sorted.len() / 2,
        m if m <= 20_000 => sorted.len() - 1,
        _ => sorted.len() - 1,
    };

    Some(sorted[index])
}

/// Alterna la selección de un tipo de servicio aplicando la exclusividad
/// de tiers: elegir un paquete premium deselecciona los básicos/estándar
/// ya elegidos y viceversa; las demás categorías son aditivas.
pub fn toggle_service_selection(
    selected: &mut Vec<i64>,
    service_type_id: i64,
    all_types: &[ServiceType],
) -> AppResult<()> {
    let chosen = all_types
        .iter()
        .find(|t| t.id == service_type_id)
        .ok_or_else(|| not_found_error("ServiceType", service_type_id))?;

    if let Some(position) = selected.iter().position(|id| *id == service_type_id) {
        selected.remove(position);
        return Ok(());
    }

    if chosen.is_premium() {
        selected.retain(|id| {
            all_types
                .iter()
                .find(|t| t.id == *id)
                .map(|t| !t.is_basic_or_standard())
                .unwrap_or(true)
        });
    } else if chosen.is_basic_or_standard() {
        selected.retain(|id| {
            all_types
                .iter()
                .find(|t| t.id == *id)
                .map(|t| !t.is_premium())
                .unwrap_or(true)
        });
    }

    selected.push(service_type_id);
    Ok(())
}

/// Petición final de creación de cita compuesta por el asistente
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub vehicle_id: i64,
    pub service_center_id: i64,
    pub service_type_ids: Vec<i64>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub contact_name: String,
    pub contact_phone: String,
    pub notes: Option<String>,
}

/// Servicio de reservas
pub struct BookingService {
    appointment_repository: AppointmentRepository,
    service_type_repository: ServiceTypeRepository,
    vehicle_repository: VehicleRepository,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            appointment_repository: AppointmentRepository::new(pool.clone()),
            service_type_repository: ServiceTypeRepository::new(pool.clone()),
            vehicle_repository: VehicleRepository::new(pool),
        }
    }

    /// Crea la cita a partir de la petición compuesta. Todas las
    /// validaciones locales corren antes de cualquier escritura; el estado
    /// inicial reconocido por el servidor es 'pending'.
    pub async fn submit(
        &self,
        ctx: &UserInfo,
        request: CreateAppointmentRequest,
    ) -> AppResult<Appointment> {
        if ctx.role != UserRole::Customer {
            return Err(AppError::Forbidden(
                "Solo un cliente puede reservar una cita".to_string(),
            ));
        }

        let now = Utc::now();
        let today = now.date_naive();

        // Revalidación completa del borrador antes de enviar
        let draft = BookingDraft {
            vehicle_id: Some(request.vehicle_id),
            service_center_id: Some(request.service_center_id),
            service_type_ids: request.service_type_ids.clone(),
            date: Some(request.date),
            time: Some(request.time),
            contact_name: Some(request.contact_name.clone()),
            contact_phone: Some(request.contact_phone.clone()),
        };
        if let Some(step) = first_invalid_step(&draft, today, now) {
            return Err(AppError::Validation(format!(
                "El paso '{}' de la reserva está incompleto o es inválido",
                step.label()
            )));
        }

        let vehicle = self
            .vehicle_repository
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", request.vehicle_id))?;
        if vehicle.customer_id != ctx.id {
            return Err(AppError::Forbidden(
                "El vehículo pertenece a otro cliente".to_string(),
            ));
        }

        let service_types = self
            .service_type_repository
            .find_by_ids(&request.service_type_ids)
            .await?;
        if service_types.len() != request.service_type_ids.len() {
            return Err(AppError::Validation(
                "Algún tipo de servicio seleccionado no existe".to_string(),
            ));
        }

        // El instante compuesto debe ser estrictamente futuro
        let naive = request.date.and_time(request.time);
        let appointment_datetime = DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc);
        if appointment_datetime <= now {
            return Err(AppError::Validation(
                "La fecha y hora de la cita deben ser futuras".to_string(),
            ));
        }

        let cost: Decimal = service_types.iter().map(|t| t.price).sum();

        let appointment = self
            .appointment_repository
            .create(NewAppointment {
                customer_id: ctx.id,
                vehicle_id: request.vehicle_id,
                service_center_id: request.service_center_id,
                appointment_datetime,
                service_type_ids: &request.service_type_ids,
                cost,
                notes: request.notes.as_deref(),
            })
            .await?;

        info!(
            "📅 Cita {} creada por el cliente {} para el {} ({} servicios)",
            appointment.id,
            ctx.id,
            appointment.appointment_datetime,
            request.service_type_ids.len()
        );

        Ok(appointment)
    }
}
