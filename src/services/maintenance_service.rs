//! Constructor de registros de mantenimiento
//!
//! Convierte la descripción textual de un tipo de servicio en un checklist
//! estructurado y agrega notas de condición, observaciones y piezas usadas
//! en un único registro. El checklist se deriva una sola vez: cuando el
//! registro ya tiene checklist almacenado se muta in place por índice y la
//! descripción nunca se vuelve a parsear para ese registro.

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::auth::{UserInfo, UserRole};
use crate::models::maintenance::{
    ChecklistItem, ChecklistSection, MaintenanceRecord, PartUsage, ReplacementAlert,
};
use crate::models::part::Part;
use crate::models::service_type::ServiceType;
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::part_repository::PartRepository;
use crate::repositories::service_type_repository::ServiceTypeRepository;
use crate::services::inventory_service::{apply_adjustments, reconcile, ReconciliationContext};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

lazy_static! {
    /// Una línea '<entero>. <texto>' abre una nueva sección del checklist
    static ref SECTION_HEADER: Regex = Regex::new(r"^(\d+)\.\s*(.+)$").unwrap();
}

/// Sección implícita para ítems que aparecen antes del primer encabezado
const DEFAULT_SECTION_TITLE: &str = "Maintenance tasks";

/// Campo del ítem de checklist sobre el que opera un toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleField {
    Completed,
    NeedsReplacement,
}

/// Entrada de pieza usada tal como llega del cliente
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PartUsageInput {
    pub part_id: i64,
    pub quantity_used: i64,
}

/// Resultado de guardar un registro
#[derive(Debug)]
pub struct SaveOutcome {
    pub record: MaintenanceRecord,
    pub replacement_alerts: Vec<ReplacementAlert>,
    pub adjustments_applied: usize,
    pub created: bool,
}

/// Parsea la descripción de un tipo de servicio en secciones.
///
/// Las líneas vacías se descartan, los encabezados `N. Título` abren
/// sección, las viñetas iniciales se eliminan y las secciones sin ítems
/// se omiten del resultado.
pub fn parse_checklist_sections(description: &str) -> Vec<ChecklistSection> {
    let mut sections: Vec<ChecklistSection> = Vec::new();

    for line in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = SECTION_HEADER.captures(line) {
            sections.push(ChecklistSection {
                title: caps[2].trim().to_string(),
                items: Vec::new(),
            });
            continue;
        }

        let item = line
            .trim_start_matches(|c| c == '•' || c == '-' || c == '*')
            .trim()
            .to_string();
        if item.is_empty() {
            continue;
        }

        if sections.is_empty() {
            sections.push(ChecklistSection {
                title: DEFAULT_SECTION_TITLE.to_string(),
                items: Vec::new(),
            });
        }
        sections
            .last_mut()
            .expect("sections is non-empty here")
            .items
            .push(item);
    }

    sections.retain(|s| !s.items.is_empty());
    sections
}

/// Materializa el checklist inicial a partir de los tipos de servicio de la
/// cita: todos los ítems arrancan sin completar y sin reemplazo requerido.
pub fn materialize_checklist(service_types: &[ServiceType]) -> Vec<ChecklistItem> {
    let mut checklist = Vec::new();
    for service_type in service_types {
        for section in parse_checklist_sections(&service_type.description) {
            for item in section.items {
                checklist.push(ChecklistItem {
                    section_title: section.title.clone(),
                    item_text: item,
                    completed: false,
                    needs_replacement: false,
                });
            }
        }
    }
    checklist
}

/// Validación local previa al guardado: el checklist no puede estar vacío
/// y al menos un ítem debe estar completado. Se rechaza antes de cualquier
/// acceso a la base de datos.
pub fn validate_for_save(checklist: &[ChecklistItem]) -> AppResult<()> {
    if checklist.is_empty() {
        return Err(AppError::Validation(
            "El checklist del registro está vacío".to_string(),
        ));
    }
    if !checklist.iter().any(|item| item.completed) {
        return Err(AppError::Validation(
            "Debe completarse al menos un ítem del checklist antes de guardar".to_string(),
        ));
    }
    Ok(())
}

/// Alertas de reemplazo: ítems cuyo flag needs_replacement pasó a true
/// respecto del checklist previamente almacenado.
pub fn replacement_alerts(
    appointment_id: i64,
    old_checklist: &[ChecklistItem],
    new_checklist: &[ChecklistItem],
) -> Vec<ReplacementAlert> {
    new_checklist
        .iter()
        .enumerate()
        .filter(|(index, item)| {
            item.needs_replacement
                && !old_checklist
                    .get(*index)
                    .map(|old| old.needs_replacement)
                    .unwrap_or(false)
        })
        .map(|(index, item)| ReplacementAlert {
            appointment_id,
            checklist_index: index,
            section_title: item.section_title.clone(),
            item_text: item.item_text.clone(),
        })
        .collect()
}

/// Fusiona las piezas entrantes con la lista previa del registro.
///
/// A lo sumo una entrada por part_id (volver a agregar una pieza actualiza
/// la cantidad in place). El unit_cost se toma de la lista previa cuando la
/// pieza ya estaba registrada, y del catálogo en la primera inserción; una
/// edición de cantidad nunca recalcula el costo capturado.
pub fn merge_part_usages(
    inputs: &[PartUsageInput],
    previous: &[PartUsage],
    catalog: &HashMap<i64, Part>,
) -> AppResult<Vec<PartUsage>> {
    let previous_by_id: HashMap<i64, &PartUsage> =
        previous.iter().map(|u| (u.part_id, u)).collect();

    let mut merged: Vec<PartUsage> = Vec::new();
    let mut index_by_id: HashMap<i64, usize> = HashMap::new();

    for input in inputs {
        if input.quantity_used <= 0 {
            return Err(AppError::Validation(format!(
                "La cantidad usada de la pieza {} debe ser positiva",
                input.part_id
            )));
        }

        if let Some(&position) = index_by_id.get(&input.part_id) {
            // Pieza repetida en la misma edición: actualiza cantidad in place
            merged[position].quantity_used = input.quantity_used;
            continue;
        }

        let usage = match previous_by_id.get(&input.part_id) {
            Some(prior) => PartUsage {
                part_id: prior.part_id,
                part_name: prior.part_name.clone(),
                quantity_used: input.quantity_used,
                unit_cost: prior.unit_cost,
            },
            None => {
                let part = catalog.get(&input.part_id).ok_or_else(|| {
                    not_found_error("Part", input.part_id)
                })?;
                PartUsage {
                    part_id: part.id,
                    part_name: part.name.clone(),
                    quantity_used: input.quantity_used,
                    unit_cost: part.unit_price,
                }
            }
        };

        index_by_id.insert(input.part_id, merged.len());
        merged.push(usage);
    }

    Ok(merged)
}

/// Payload de guardado del registro
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SaveMaintenanceRecordRequest {
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub condition_notes: BTreeMap<usize, String>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub parts_used: Vec<PartUsageInput>,
}

/// Servicio de registros de mantenimiento
pub struct MaintenanceService {
    maintenance_repository: MaintenanceRepository,
    appointment_repository: AppointmentRepository,
    part_repository: PartRepository,
    service_type_repository: ServiceTypeRepository,
}

impl MaintenanceService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            maintenance_repository: MaintenanceRepository::new(pool.clone()),
            appointment_repository: AppointmentRepository::new(pool.clone()),
            part_repository: PartRepository::new(pool.clone()),
            service_type_repository: ServiceTypeRepository::new(pool),
        }
    }

    /// Obtiene el registro de una cita, si existe
    pub async fn get_record(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
    ) -> AppResult<Option<MaintenanceRecord>> {
        let appointment = self.authorized_appointment(ctx, appointment_id).await?;
        self.maintenance_repository
            .find_by_appointment(appointment.id)
            .await
    }

    /// Crea o actualiza el registro de la cita.
    ///
    /// La primera persistencia fija la lista de piezas como línea base sin
    /// tocar inventario; cada guardado posterior concilia contra la última
    /// lista persistida y aplica los deltas en secuencia antes de escribir
    /// el registro.
    pub async fn save_record(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
        request: SaveMaintenanceRecordRequest,
    ) -> AppResult<SaveOutcome> {
        let appointment = self.authorized_appointment(ctx, appointment_id).await?;

        if appointment.status != AppointmentStatus::InProgress {
            return Err(AppError::Validation(format!(
                "El registro solo puede guardarse con la cita en curso (estado actual '{}')",
                appointment.status.as_str()
            )));
        }

        let existing = self
            .maintenance_repository
            .find_by_appointment(appointment_id)
            .await?;

        // Derivar una vez, luego poseer: solo se parsea la descripción
        // cuando no hay checklist almacenado ni checklist entrante
        let checklist = if !request.checklist.is_empty() {
            request.checklist
        } else if let Some(record) = &existing {
            record.checklist.clone()
        } else {
            let service_type_ids = self
                .appointment_repository
                .find_service_type_ids(appointment_id)
                .await?;
            let service_types = self
                .service_type_repository
                .find_by_ids(&service_type_ids)
                .await?;
            materialize_checklist(&service_types)
        };

        validate_for_save(&checklist)?;

        // Catálogo para captura de precio de piezas nuevas
        let requested_ids: Vec<i64> = request.parts_used.iter().map(|p| p.part_id).collect();
        let catalog: HashMap<i64, Part> = self
            .part_repository
            .find_by_ids(&requested_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let previous_parts: Vec<PartUsage> = existing
            .as_ref()
            .map(|r| r.parts_used.clone())
            .unwrap_or_default();
        let merged_parts = merge_part_usages(&request.parts_used, &previous_parts, &catalog)?;

        let old_checklist: Vec<ChecklistItem> = existing
            .as_ref()
            .map(|r| r.checklist.clone())
            .unwrap_or_default();
        let alerts = replacement_alerts(appointment_id, &old_checklist, &checklist);
        for alert in &alerts {
            warn!(
                "🔩 Reemplazo requerido en cita {}: [{}] {}",
                alert.appointment_id, alert.section_title, alert.item_text
            );
        }

        let mut staff_ids: Vec<i64> = existing
            .as_ref()
            .map(|r| r.staff_ids.clone())
            .unwrap_or_default();
        if !staff_ids.contains(&ctx.id) {
            staff_ids.push(ctx.id);
        }

        let outcome = match existing {
            None => {
                // Primera persistencia: la lista de piezas queda como línea
                // base para todos los diffs posteriores, sin ajustes
                let record = self
                    .maintenance_repository
                    .create(
                        appointment_id,
                        &checklist,
                        &request.condition_notes,
                        request.remarks.as_deref(),
                        &merged_parts,
                        &staff_ids,
                    )
                    .await?;
                info!(
                    "🆕 Registro de mantenimiento {} creado para la cita {}",
                    record.id, appointment_id
                );
                SaveOutcome {
                    record,
                    replacement_alerts: alerts,
                    adjustments_applied: 0,
                    created: true,
                }
            }
            Some(previous_record) => {
                let adjustments = reconcile(&previous_record.parts_used, &merged_parts);
                let applied = apply_adjustments(
                    &self.part_repository,
                    ReconciliationContext {
                        service_center_id: appointment.service_center_id,
                        appointment_id,
                        record_id: previous_record.id,
                    },
                    &adjustments,
                )
                .await?;

                let record = self
                    .maintenance_repository
                    .update(
                        previous_record.id,
                        &checklist,
                        &request.condition_notes,
                        request.remarks.as_deref(),
                        &merged_parts,
                        &staff_ids,
                    )
                    .await?;
                info!(
                    "💾 Registro de mantenimiento {} actualizado ({} ajustes de inventario)",
                    record.id, applied
                );
                SaveOutcome {
                    record,
                    replacement_alerts: alerts,
                    adjustments_applied: applied,
                    created: false,
                }
            }
        };

        Ok(outcome)
    }

    /// Invierte un flag de un ítem del checklist de un registro ya guardado.
    /// Pasar needs_replacement a true emite la alerta de reemplazo; no muta
    /// inventario.
    pub async fn toggle_item(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
        index: usize,
        field: ToggleField,
    ) -> AppResult<(MaintenanceRecord, Option<ReplacementAlert>)> {
        let _ = self.authorized_appointment(ctx, appointment_id).await?;

        let record = self
            .maintenance_repository
            .find_by_appointment(appointment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "La cita {} no tiene registro de mantenimiento guardado",
                    appointment_id
                ))
            })?;

        let mut checklist = record.checklist.clone();
        let item = checklist.get_mut(index).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Índice de checklist {} fuera de rango (largo {})",
                index,
                record.checklist.len()
            ))
        })?;

        let mut alert = None;
        match field {
            ToggleField::Completed => {
                item.completed = !item.completed;
            }
            ToggleField::NeedsReplacement => {
                item.needs_replacement = !item.needs_replacement;
                if item.needs_replacement {
                    let new_alert = ReplacementAlert {
                        appointment_id,
                        checklist_index: index,
                        section_title: item.section_title.clone(),
                        item_text: item.item_text.clone(),
                    };
                    warn!(
                        "🔩 Reemplazo requerido en cita {}: [{}] {}",
                        appointment_id, new_alert.section_title, new_alert.item_text
                    );
                    alert = Some(new_alert);
                }
            }
        }

        let updated = self
            .maintenance_repository
            .update(
                record.id,
                &checklist,
                &record.condition_notes,
                record.remarks.as_deref(),
                &record.parts_used,
                &record.staff_ids,
            )
            .await?;

        Ok((updated, alert))
    }

    /// Busca la cita y verifica que el actor pueda operar sobre su registro
    async fn authorized_appointment(
        &self,
        ctx: &UserInfo,
        appointment_id: i64,
    ) -> AppResult<Appointment> {
        let appointment = self
            .appointment_repository
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| not_found_error("Appointment", appointment_id))?;

        match ctx.role {
            UserRole::Customer => {
                if appointment.customer_id != ctx.id {
                    return Err(AppError::Forbidden(
                        "La cita pertenece a otro cliente".to_string(),
                    ));
                }
            }
            UserRole::Staff | UserRole::Technician | UserRole::Manager => {
                if ctx.service_center_id != Some(appointment.service_center_id) {
                    return Err(AppError::Forbidden(
                        "La cita pertenece a otro centro de servicio".to_string(),
                    ));
                }
            }
        }

        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_sections_with_headers_and_bullets() {
        let description = "1. Brakes\nCheck pads\n• Check fluid\n2. Tires\nRotate";
        let sections = parse_checklist_sections(description);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Brakes");
        assert_eq!(sections[0].items, vec!["Check pads", "Check fluid"]);
        assert_eq!(sections[1].title, "Tires");
        assert_eq!(sections[1].items, vec!["Rotate"]);
    }

    #[test]
    fn test_parse_leading_items_get_default_section() {
        let sections = parse_checklist_sections("- Cambiar aceite\n1. Frenos\nRevisar pastillas");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, DEFAULT_SECTION_TITLE);
        assert_eq!(sections[0].items, vec!["Cambiar aceite"]);
        assert_eq!(sections[1].title, "Frenos");
    }

    #[test]
    fn test_parse_drops_empty_sections() {
        let sections = parse_checklist_sections("1. Vacía\n2. Con ítems\n* Revisar luces");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Con ítems");
    }

    #[test]
    fn test_parse_ignores_blank_lines() {
        let sections = parse_checklist_sections("\n\n1. Motor\n\n  Revisar bujías  \n\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items, vec!["Revisar bujías"]);
    }

    fn service_type(description: &str) -> ServiceType {
        ServiceType {
            id: 1,
            name: "Mantenimiento básico".to_string(),
            description: description.to_string(),
            category: Some("basic".to_string()),
            price: Decimal::from(100),
            duration_estimate_minutes: 60,
        }
    }

    #[test]
    fn test_materialize_checklist_starts_unchecked() {
        let checklist = materialize_checklist(&[service_type("1. Frenos\nRevisar pastillas\nRevisar líquido")]);
        assert_eq!(checklist.len(), 2);
        assert!(checklist.iter().all(|i| !i.completed && !i.needs_replacement));
        assert_eq!(checklist[0].section_title, "Frenos");
    }

    fn item(completed: bool, needs_replacement: bool) -> ChecklistItem {
        ChecklistItem {
            section_title: "Frenos".to_string(),
            item_text: "Revisar pastillas".to_string(),
            completed,
            needs_replacement,
        }
    }

    #[test]
    fn test_validate_for_save() {
        assert!(validate_for_save(&[]).is_err());
        assert!(validate_for_save(&[item(false, false)]).is_err());
        assert!(validate_for_save(&[item(true, false), item(false, false)]).is_ok());
    }

    #[test]
    fn test_replacement_alerts_only_on_new_flags() {
        let old = vec![item(false, false), item(false, true)];
        let new = vec![item(false, true), item(true, true)];

        let alerts = replacement_alerts(7, &old, &new);
        // Solo el índice 0 pasó de false a true; el 1 ya estaba marcado
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].checklist_index, 0);
        assert_eq!(alerts[0].appointment_id, 7);
    }

    #[test]
    fn test_replacement_alerts_on_first_save() {
        let new = vec![item(true, true)];
        let alerts = replacement_alerts(3, &[], &new);
        assert_eq!(alerts.len(), 1);
    }

    fn part(id: i64, name: &str, price: i64) -> Part {
        Part {
            id,
            name: name.to_string(),
            description: None,
            unit_price: Decimal::from(price),
            min_stock_level: 0,
            inventory_quantity: 100,
        }
    }

    fn prior_usage(part_id: i64, qty: i64, cost: i64) -> PartUsage {
        PartUsage {
            part_id,
            part_name: format!("pieza-{}", part_id),
            quantity_used: qty,
            unit_cost: Decimal::from(cost),
        }
    }

    #[test]
    fn test_merge_captures_catalog_price_on_insert() {
        let catalog: HashMap<i64, Part> = [(1, part(1, "Filtro", 25))].into_iter().collect();
        let merged = merge_part_usages(
            &[PartUsageInput {
                part_id: 1,
                quantity_used: 2,
            }],
            &[],
            &catalog,
        )
        .unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].part_name, "Filtro");
        assert_eq!(merged[0].unit_cost, Decimal::from(25));
    }

    #[test]
    fn test_merge_preserves_historical_cost_on_quantity_edit() {
        // El catálogo ya subió el precio a 40, pero el costo capturado era 25
        let catalog: HashMap<i64, Part> = [(1, part(1, "Filtro", 40))].into_iter().collect();
        let previous = vec![prior_usage(1, 2, 25)];

        let merged = merge_part_usages(
            &[PartUsageInput {
                part_id: 1,
                quantity_used: 5,
            }],
            &previous,
            &catalog,
        )
        .unwrap();

        assert_eq!(merged[0].quantity_used, 5);
        assert_eq!(merged[0].unit_cost, Decimal::from(25));
    }

    #[test]
    fn test_merge_dedupes_repeated_part() {
        let catalog: HashMap<i64, Part> = [(1, part(1, "Filtro", 25))].into_iter().collect();
        let merged = merge_part_usages(
            &[
                PartUsageInput {
                    part_id: 1,
                    quantity_used: 2,
                },
                PartUsageInput {
                    part_id: 1,
                    quantity_used: 6,
                },
            ],
            &[],
            &catalog,
        )
        .unwrap();

        // A lo sumo una entrada por part_id; la última cantidad gana
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity_used, 6);
    }

    #[test]
    fn test_merge_rejects_non_positive_quantity() {
        let catalog = HashMap::new();
        let err = merge_part_usages(
            &[PartUsageInput {
                part_id: 1,
                quantity_used: 0,
            }],
            &[],
            &catalog,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_merge_unknown_part_is_not_found() {
        let catalog = HashMap::new();
        let err = merge_part_usages(
            &[PartUsageInput {
                part_id: 99,
                quantity_used: 1,
            }],
            &[],
            &catalog,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
