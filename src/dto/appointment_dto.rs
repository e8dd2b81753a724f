use crate::models::appointment::{Appointment, AssignedTechnician};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Request para transicionar el estado de una cita
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub target_status: String,
}

// Response de una transición aplicada
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub appointment: Appointment,
    pub warning: Option<String>,
}

// Request para reemplazar los técnicos asignados a una cita
#[derive(Debug, Deserialize, Validate)]
pub struct AssignTechniciansRequest {
    #[validate(custom = "crate::utils::validation::validate_id_set")]
    pub technician_ids: Vec<i64>,
    pub notes: Option<String>,
}

// Response de una asignación aplicada
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub appointment_id: i64,
    pub technicians: Vec<AssignedTechnician>,
}
