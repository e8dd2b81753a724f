use crate::dto::booking_dto::{
    CalendarQuery, CalendarResponse, RecommendationQuery, RecommendationResponse, SlotsQuery,
    SlotsResponse,
};
use crate::models::appointment::Appointment;
use crate::models::auth::{UserInfo, UserRole};
use crate::models::vehicle::Vehicle;
use crate::repositories::service_type_repository::ServiceTypeRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::booking_service::{recommend_package, BookingService, CreateAppointmentRequest};
use crate::services::scheduling_service::{
    available_time_slots, generate_calendar_grid, is_within_booking_window,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_date;
use chrono::Utc;
use sqlx::PgPool;

pub struct BookingController {
    booking_service: BookingService,
    vehicle_repository: VehicleRepository,
    service_type_repository: ServiceTypeRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            booking_service: BookingService::new(pool.clone()),
            vehicle_repository: VehicleRepository::new(pool.clone()),
            service_type_repository: ServiceTypeRepository::new(pool),
        }
    }

    /// Grilla del calendario del mes pedido, lunes primero
    pub fn calendar(&self, query: CalendarQuery) -> AppResult<CalendarResponse> {
        if !(1..=12).contains(&query.month) {
            return Err(AppError::BadRequest(format!(
                "Mes inválido: {}",
                query.month
            )));
        }

        Ok(CalendarResponse {
            month: query.month,
            year: query.year,
            grid: generate_calendar_grid(query.month, query.year),
        })
    }

    /// Franjas horarias disponibles para una fecha. Una fecha fuera de la
    /// ventana de reserva degrada a lista vacía, no a error.
    pub fn slots(&self, query: SlotsQuery) -> AppResult<SlotsResponse> {
        let date = validate_date(&query.date)
            .map_err(|_| AppError::BadRequest(format!("Fecha inválida: {}", query.date)))?;

        let now = Utc::now();
        let slots = if is_within_booking_window(date, now.date_naive()) {
            available_time_slots(date, now)
        } else {
            Vec::new()
        };

        Ok(SlotsResponse { date, slots })
    }

    /// Paquete recomendado según el kilometraje actual del vehículo
    pub async fn recommendation(
        &self,
        ctx: &UserInfo,
        query: RecommendationQuery,
    ) -> AppResult<RecommendationResponse> {
        let vehicle = self
            .vehicle_repository
            .find_by_id(query.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", query.vehicle_id))?;

        if ctx.role == UserRole::Customer && vehicle.customer_id != ctx.id {
            return Err(AppError::Forbidden(
                "El vehículo pertenece a otro cliente".to_string(),
            ));
        }

        let service_types = self.service_type_repository.find_all().await?;
        let recommended = recommend_package(vehicle.current_mileage_km, &service_types).cloned();

        Ok(RecommendationResponse {
            vehicle_id: vehicle.id,
            current_mileage_km: vehicle.current_mileage_km,
            recommended,
        })
    }

    /// Vehículos del cliente autenticado
    pub async fn my_vehicles(&self, ctx: &UserInfo) -> AppResult<Vec<Vehicle>> {
        self.vehicle_repository.list_for_customer(ctx.id).await
    }

    pub async fn submit(
        &self,
        ctx: &UserInfo,
        request: CreateAppointmentRequest,
    ) -> AppResult<Appointment> {
        self.booking_service.submit(ctx, request).await
    }
}
