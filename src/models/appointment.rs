//! Modelo de Appointment
//!
//! Este módulo contiene la cita de mantenimiento y su máquina de estados.
//! El estado canónico terminal de una cita finalizada es 'completed';
//! la ortografía legacy 'done' se acepta como alias al parsear.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado de la cita - mapea a la columna TEXT appointments.status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Accepted => "accepted",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parsea un estado; 'done' es un alias legacy de 'completed'
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "accepted" => Some(AppointmentStatus::Accepted),
            "in_progress" => Some(AppointmentStatus::InProgress),
            "completed" | "done" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Un estado terminal no admite ninguna transición posterior
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

/// Appointment principal - mapea a la tabla appointments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub customer_id: i64,
    pub vehicle_id: i64,
    pub service_center_id: i64,
    pub appointment_datetime: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub cost: Decimal,
    pub notes: Option<String>,
    pub assignment_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Técnico asignado a una cita - relación pura appointment <-> technician
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignedTechnician {
    pub appointment_id: i64,
    pub technician_id: i64,
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Accepted,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(AppointmentStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_done_is_alias_of_completed() {
        assert_eq!(
            AppointmentStatus::from_str("done"),
            Some(AppointmentStatus::Completed)
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Accepted.is_terminal());
        assert!(!AppointmentStatus::InProgress.is_terminal());
    }
}
