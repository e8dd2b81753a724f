//! Repositorio de citas y asignaciones de técnicos

use crate::models::appointment::{Appointment, AppointmentStatus, AssignedTechnician};
use crate::utils::errors::AppResult;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Datos de una cita nueva compuesta por el flujo de reserva
#[derive(Debug)]
pub struct NewAppointment<'a> {
    pub customer_id: i64,
    pub vehicle_id: i64,
    pub service_center_id: i64,
    pub appointment_datetime: DateTime<Utc>,
    pub service_type_ids: &'a [i64],
    pub cost: Decimal,
    pub notes: Option<&'a str>,
}

pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea la cita y sus vínculos a tipos de servicio en una transacción
    pub async fn create(&self, new: NewAppointment<'_>) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments
                (customer_id, vehicle_id, service_center_id, appointment_datetime, status, cost, notes)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.customer_id)
        .bind(new.vehicle_id)
        .bind(new.service_center_id)
        .bind(new.appointment_datetime)
        .bind(new.cost)
        .bind(new.notes)
        .fetch_one(&mut *tx)
        .await?;

        for service_type_id in new.service_type_ids {
            sqlx::query(
                "INSERT INTO appointment_service_types (appointment_id, service_type_id) VALUES ($1, $2)",
            )
            .bind(appointment.id)
            .bind(service_type_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(appointment)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Appointment>> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(appointment)
    }

    /// Actualiza el estado y devuelve la fila autoritativa
    pub async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> AppResult<Appointment> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn list_for_customer(&self, customer_id: i64) -> AppResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE customer_id = $1 ORDER BY appointment_datetime DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    pub async fn list_for_center(&self, service_center_id: i64) -> AppResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE service_center_id = $1 ORDER BY appointment_datetime DESC",
        )
        .bind(service_center_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    /// Citas en las que el técnico figura en el conjunto asignado
    pub async fn list_for_technician(&self, technician_id: i64) -> AppResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT a.* FROM appointments a
            JOIN appointment_technicians t ON t.appointment_id = a.id
            WHERE t.technician_id = $1
            ORDER BY a.appointment_datetime DESC
            "#,
        )
        .bind(technician_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    pub async fn is_technician_assigned(
        &self,
        appointment_id: i64,
        technician_id: i64,
    ) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM appointment_technicians WHERE appointment_id = $1 AND technician_id = $2)",
        )
        .bind(appointment_id)
        .bind(technician_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    /// Reemplaza el conjunto completo de técnicos asignados (no fusiona)
    pub async fn replace_technicians(
        &self,
        appointment_id: i64,
        technician_ids: &[i64],
        notes: Option<&str>,
    ) -> AppResult<Vec<AssignedTechnician>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM appointment_technicians WHERE appointment_id = $1")
            .bind(appointment_id)
            .execute(&mut *tx)
            .await?;

        for technician_id in technician_ids {
            sqlx::query(
                "INSERT INTO appointment_technicians (appointment_id, technician_id) VALUES ($1, $2)",
            )
            .bind(appointment_id)
            .bind(technician_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE appointments SET assignment_notes = $2 WHERE id = $1")
            .bind(appointment_id)
            .bind(notes)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.find_technicians(appointment_id).await
    }

    pub async fn find_technicians(
        &self,
        appointment_id: i64,
    ) -> AppResult<Vec<AssignedTechnician>> {
        let technicians = sqlx::query_as::<_, AssignedTechnician>(
            r#"
            SELECT t.appointment_id, t.technician_id, u.full_name
            FROM appointment_technicians t
            JOIN users u ON u.id = t.technician_id
            WHERE t.appointment_id = $1
            ORDER BY t.technician_id
            "#,
        )
        .bind(appointment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(technicians)
    }

    pub async fn find_service_type_ids(&self, appointment_id: i64) -> AppResult<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT service_type_id FROM appointment_service_types WHERE appointment_id = $1 ORDER BY service_type_id",
        )
        .bind(appointment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
