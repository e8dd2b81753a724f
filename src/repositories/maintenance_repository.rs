//! Repositorio de registros de mantenimiento
//!
//! El checklist, las notas de condición y las piezas usadas se guardan
//! como documentos JSONB dentro de la fila del registro.

use crate::models::maintenance::{ChecklistItem, MaintenanceRecord, PartUsage};
use crate::utils::errors::AppResult;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;

/// Fila cruda con los documentos JSONB aún envueltos
#[derive(Debug, FromRow)]
struct MaintenanceRecordRow {
    id: i64,
    appointment_id: i64,
    checklist: Json<Vec<ChecklistItem>>,
    condition_notes: Json<BTreeMap<usize, String>>,
    remarks: Option<String>,
    parts_used: Json<Vec<PartUsage>>,
    staff_ids: Json<Vec<i64>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MaintenanceRecordRow> for MaintenanceRecord {
    fn from(row: MaintenanceRecordRow) -> Self {
        Self {
            id: row.id,
            appointment_id: row.appointment_id,
            checklist: row.checklist.0,
            condition_notes: row.condition_notes.0,
            remarks: row.remarks,
            parts_used: row.parts_used.0,
            staff_ids: row.staff_ids.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_appointment(
        &self,
        appointment_id: i64,
    ) -> AppResult<Option<MaintenanceRecord>> {
        let row = sqlx::query_as::<_, MaintenanceRecordRow>(
            "SELECT * FROM maintenance_records WHERE appointment_id = $1",
        )
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(MaintenanceRecord::from))
    }

    /// Crea el registro en su primera persistencia
    pub async fn create(
        &self,
        appointment_id: i64,
        checklist: &[ChecklistItem],
        condition_notes: &BTreeMap<usize, String>,
        remarks: Option<&str>,
        parts_used: &[PartUsage],
        staff_ids: &[i64],
    ) -> AppResult<MaintenanceRecord> {
        let row = sqlx::query_as::<_, MaintenanceRecordRow>(
            r#"
            INSERT INTO maintenance_records
                (appointment_id, checklist, condition_notes, remarks, parts_used, staff_ids)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(appointment_id)
        .bind(Json(checklist))
        .bind(Json(condition_notes))
        .bind(remarks)
        .bind(Json(parts_used))
        .bind(Json(staff_ids))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    /// Actualiza el registro in place; el registro nunca se recrea
    pub async fn update(
        &self,
        record_id: i64,
        checklist: &[ChecklistItem],
        condition_notes: &BTreeMap<usize, String>,
        remarks: Option<&str>,
        parts_used: &[PartUsage],
        staff_ids: &[i64],
    ) -> AppResult<MaintenanceRecord> {
        let row = sqlx::query_as::<_, MaintenanceRecordRow>(
            r#"
            UPDATE maintenance_records
            SET checklist = $2,
                condition_notes = $3,
                remarks = $4,
                parts_used = $5,
                staff_ids = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(record_id)
        .bind(Json(checklist))
        .bind(Json(condition_notes))
        .bind(remarks)
        .bind(Json(parts_used))
        .bind(Json(staff_ids))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
