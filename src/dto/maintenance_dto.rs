use crate::models::maintenance::{MaintenanceRecord, ReplacementAlert};
use serde::{Deserialize, Serialize};

// Request para invertir un flag de un ítem del checklist
#[derive(Debug, Deserialize)]
pub struct ToggleItemRequest {
    /// "completed" o "needs_replacement"
    pub field: String,
}

// Response de guardado del registro
#[derive(Debug, Serialize)]
pub struct SaveRecordResponse {
    pub record: MaintenanceRecord,
    pub replacement_alerts: Vec<ReplacementAlert>,
    pub adjustments_applied: usize,
    pub created: bool,
}

// Response de un toggle aplicado
#[derive(Debug, Serialize)]
pub struct ToggleItemResponse {
    pub record: MaintenanceRecord,
    pub replacement_alert: Option<ReplacementAlert>,
}
