//! Conciliación de uso de piezas contra el inventario compartido
//!
//! El algoritmo más crítico del sistema: cada edición de la lista de
//! piezas de un registro de mantenimiento se convierte en el conjunto
//! mínimo de ajustes de inventario (delta por pieza) y se aplica en
//! secuencia, nunca en paralelo, para acotar el efecto de una falla
//! parcial. Un ajuste ya aplicado no se revierte; la falla se reporta
//! con el contexto necesario para conciliación manual.

use crate::models::part::{AdjustmentDirection, InventoryAdjustment};
use crate::models::maintenance::PartUsage;
use crate::utils::errors::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{error, info};

/// Colaborador que materializa un ajuste sobre el stock compartido.
/// Implementado por PartRepository; abstracto para poder probar la
/// semántica de falla parcial sin base de datos.
#[async_trait]
pub trait InventoryStore: Sync {
    async fn update_inventory_quantity(
        &self,
        part_id: i64,
        magnitude: i64,
        direction: AdjustmentDirection,
    ) -> AppResult<()>;
}

/// Contexto que acompaña cada ajuste en los logs
#[derive(Debug, Clone, Copy)]
pub struct ReconciliationContext {
    pub service_center_id: i64,
    pub appointment_id: i64,
    pub record_id: i64,
}

/// Calcula el delta entre la lista de piezas anterior y la nueva y emite
/// los ajustes mínimos necesarios. Determinista: ordenado por part_id.
pub fn reconcile(old_parts: &[PartUsage], new_parts: &[PartUsage]) -> Vec<InventoryAdjustment> {
    let mut old_quantities: BTreeMap<i64, i64> = BTreeMap::new();
    for usage in old_parts {
        *old_quantities.entry(usage.part_id).or_insert(0) += usage.quantity_used;
    }

    let mut new_quantities: BTreeMap<i64, i64> = BTreeMap::new();
    for usage in new_parts {
        *new_quantities.entry(usage.part_id).or_insert(0) += usage.quantity_used;
    }

    // Unión de part_ids de ambas listas, en orden
    let mut part_ids: Vec<i64> = old_quantities.keys().copied().collect();
    for id in new_quantities.keys() {
        if !old_quantities.contains_key(id) {
            part_ids.push(*id);
        }
    }
    part_ids.sort_unstable();

    let mut adjustments = Vec::new();
    for part_id in part_ids {
        let old_qty = old_quantities.get(&part_id).copied().unwrap_or(0);
        let new_qty = new_quantities.get(&part_id).copied().unwrap_or(0);
        let delta = new_qty - old_qty;

        if delta > 0 {
            adjustments.push(InventoryAdjustment {
                part_id,
                magnitude: delta,
                direction: AdjustmentDirection::ConsumeFromStock,
            });
        } else if delta < 0 {
            adjustments.push(InventoryAdjustment {
                part_id,
                magnitude: -delta,
                direction: AdjustmentDirection::ReturnToStock,
            });
        }
    }

    adjustments
}

/// Aplica los ajustes en orden, uno a la vez. Ante la primera falla se
/// detiene y devuelve ReconciliationPartial con la pieza, el delta
/// intentado y cuántos ajustes previos ya quedaron aplicados.
pub async fn apply_adjustments(
    store: &dyn InventoryStore,
    ctx: ReconciliationContext,
    adjustments: &[InventoryAdjustment],
) -> AppResult<usize> {
    let mut applied = 0usize;

    for adjustment in adjustments {
        let signed_delta = match adjustment.direction {
            AdjustmentDirection::ConsumeFromStock => adjustment.magnitude,
            AdjustmentDirection::ReturnToStock => -adjustment.magnitude,
        };

        match store
            .update_inventory_quantity(
                adjustment.part_id,
                adjustment.magnitude,
                adjustment.direction,
            )
            .await
        {
            Ok(()) => {
                applied += 1;
                info!(
                    "📦 Ajuste de inventario aplicado (centro {}, cita {}, registro {}): pieza {} delta {}",
                    ctx.service_center_id,
                    ctx.appointment_id,
                    ctx.record_id,
                    adjustment.part_id,
                    signed_delta
                );
            }
            Err(e) => {
                error!(
                    "❌ Falla de ajuste de inventario (centro {}, cita {}, registro {}): pieza {} delta {}: {}",
                    ctx.service_center_id,
                    ctx.appointment_id,
                    ctx.record_id,
                    adjustment.part_id,
                    signed_delta,
                    e
                );
                return Err(AppError::ReconciliationPartial {
                    part_id: adjustment.part_id,
                    delta: signed_delta,
                    applied,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn usage(part_id: i64, qty: i64) -> PartUsage {
        PartUsage {
            part_id,
            part_name: format!("pieza-{}", part_id),
            quantity_used: qty,
            unit_cost: Decimal::from(10),
        }
    }

    #[test]
    fn test_reconcile_identical_lists_is_empty() {
        let parts = vec![usage(1, 2), usage(2, 4)];
        assert!(reconcile(&parts, &parts).is_empty());
        assert!(reconcile(&[], &[]).is_empty());
    }

    #[test]
    fn test_reconcile_increase_and_new_part() {
        let old = vec![usage(1, 2)];
        let new = vec![usage(1, 5), usage(2, 1)];

        let adjustments = reconcile(&old, &new);
        assert_eq!(
            adjustments,
            vec![
                InventoryAdjustment {
                    part_id: 1,
                    magnitude: 3,
                    direction: AdjustmentDirection::ConsumeFromStock,
                },
                InventoryAdjustment {
                    part_id: 2,
                    magnitude: 1,
                    direction: AdjustmentDirection::ConsumeFromStock,
                },
            ]
        );
    }

    #[test]
    fn test_reconcile_decrease_returns_stock() {
        let old = vec![usage(1, 5)];
        let new = vec![usage(1, 2)];

        let adjustments = reconcile(&old, &new);
        assert_eq!(
            adjustments,
            vec![InventoryAdjustment {
                part_id: 1,
                magnitude: 3,
                direction: AdjustmentDirection::ReturnToStock,
            }]
        );
    }

    #[test]
    fn test_reconcile_removed_part_returns_full_quantity() {
        let old = vec![usage(1, 2), usage(2, 3)];
        let new = vec![usage(1, 2)];

        let adjustments = reconcile(&old, &new);
        assert_eq!(
            adjustments,
            vec![InventoryAdjustment {
                part_id: 2,
                magnitude: 3,
                direction: AdjustmentDirection::ReturnToStock,
            }]
        );
    }

    /// Store de prueba: registra los ajustes y falla en un part_id elegido
    struct RecordingStore {
        fail_on_part: Option<i64>,
        seen: Mutex<Vec<(i64, i64, AdjustmentDirection)>>,
    }

    #[async_trait]
    impl InventoryStore for RecordingStore {
        async fn update_inventory_quantity(
            &self,
            part_id: i64,
            magnitude: i64,
            direction: AdjustmentDirection,
        ) -> AppResult<()> {
            if self.fail_on_part == Some(part_id) {
                return Err(AppError::Conflict(format!(
                    "stock insuficiente para la pieza {}",
                    part_id
                )));
            }
            self.seen.lock().unwrap().push((part_id, magnitude, direction));
            Ok(())
        }
    }

    fn ctx() -> ReconciliationContext {
        ReconciliationContext {
            service_center_id: 1,
            appointment_id: 10,
            record_id: 100,
        }
    }

    #[tokio::test]
    async fn test_apply_adjustments_sequentially() {
        let store = RecordingStore {
            fail_on_part: None,
            seen: Mutex::new(Vec::new()),
        };
        let adjustments = reconcile(&[usage(1, 1)], &[usage(1, 4), usage(3, 2)]);

        let applied = apply_adjustments(&store, ctx(), &adjustments).await.unwrap();
        assert_eq!(applied, 2);

        let seen = store.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (1, 3, AdjustmentDirection::ConsumeFromStock),
                (3, 2, AdjustmentDirection::ConsumeFromStock),
            ]
        );
    }

    #[tokio::test]
    async fn test_partial_failure_stops_and_reports() {
        let store = RecordingStore {
            fail_on_part: Some(2),
            seen: Mutex::new(Vec::new()),
        };
        let adjustments = vec![
            InventoryAdjustment {
                part_id: 1,
                magnitude: 1,
                direction: AdjustmentDirection::ConsumeFromStock,
            },
            InventoryAdjustment {
                part_id: 2,
                magnitude: 5,
                direction: AdjustmentDirection::ConsumeFromStock,
            },
            InventoryAdjustment {
                part_id: 3,
                magnitude: 1,
                direction: AdjustmentDirection::ConsumeFromStock,
            },
        ];

        let err = apply_adjustments(&store, ctx(), &adjustments)
            .await
            .unwrap_err();

        match err {
            AppError::ReconciliationPartial {
                part_id,
                delta,
                applied,
                ..
            } => {
                assert_eq!(part_id, 2);
                assert_eq!(delta, 5);
                assert_eq!(applied, 1);
            }
            other => panic!("error inesperado: {:?}", other),
        }

        // La pieza posterior a la falla no se toca
        let seen = store.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 1);
    }
}
