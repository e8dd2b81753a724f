//! Modelo de MaintenanceRecord
//!
//! Registro de mantenimiento de una cita: checklist estructurado,
//! notas de condición del vehículo y piezas consumidas. El checklist
//! y las piezas se almacenan como documentos JSONB en la fila.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ítem del checklist, derivado una sola vez de la descripción textual
/// del tipo de servicio y mutado in place a partir de entonces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistItem {
    pub section_title: String,
    pub item_text: String,
    pub completed: bool,
    pub needs_replacement: bool,
}

/// Sección intermedia producida por el parser de descripciones
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistSection {
    pub title: String,
    pub items: Vec<String>,
}

/// Pieza consumida dentro de un registro de mantenimiento.
/// unit_cost se captura del catálogo al momento de la inserción y no se
/// recalcula en ediciones de cantidad, preservando el costo histórico.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartUsage {
    pub part_id: i64,
    pub part_name: String,
    pub quantity_used: i64,
    pub unit_cost: Decimal,
}

/// Registro de mantenimiento - mapea a la tabla maintenance_records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub appointment_id: i64,
    pub checklist: Vec<ChecklistItem>,
    /// Notas de condición del vehículo, indexadas por ítem del checklist
    pub condition_notes: BTreeMap<usize, String>,
    pub remarks: Option<String>,
    pub parts_used: Vec<PartUsage>,
    pub staff_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Alerta emitida cuando un ítem del checklist se marca como
/// 'necesita reemplazo'. No muta inventario por sí misma.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReplacementAlert {
    pub appointment_id: i64,
    pub checklist_index: usize,
    pub section_title: String,
    pub item_text: String,
}
