//! Flujo completo de taller sobre la superficie pura de la librería
//!
//! Recorre el ciclo reserva → aceptación → trabajo → registro → conciliación
//! de piezas sin tocar la base de datos.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;

use service_center_backend::models::appointment::AppointmentStatus;
use service_center_backend::models::auth::UserRole;
use service_center_backend::models::maintenance::PartUsage;
use service_center_backend::models::part::{AdjustmentDirection, Part};
use service_center_backend::models::service_type::ServiceType;
use service_center_backend::services::appointment_service::validate_transition;
use service_center_backend::services::booking_service::{
    first_invalid_step, recommend_package, BookingDraft,
};
use service_center_backend::services::inventory_service::reconcile;
use service_center_backend::services::maintenance_service::{
    materialize_checklist, merge_part_usages, replacement_alerts, validate_for_save,
    PartUsageInput,
};

fn oil_service() -> ServiceType {
    ServiceType {
        id: 1,
        name: "Cambio de aceite".to_string(),
        description: "1. Lubricación\n• Drenar aceite usado\n• Cambiar filtro de aceite\n2. Inspección\n- Revisar niveles\n- Revisar fugas".to_string(),
        category: Some("basic".to_string()),
        price: Decimal::from(120),
        duration_estimate_minutes: 45,
    }
}

fn part(id: i64, name: &str, price: i64) -> Part {
    Part {
        id,
        name: name.to_string(),
        description: None,
        unit_price: Decimal::from(price),
        min_stock_level: 2,
        inventory_quantity: 10,
    }
}

#[test]
fn test_full_workshop_flow() {
    // 1. El cliente arma el borrador de reserva paso a paso
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 10, 0, 0).unwrap();
    let today = now.date_naive();

    let draft = BookingDraft {
        vehicle_id: Some(11),
        service_center_id: Some(1),
        service_type_ids: vec![1],
        date: NaiveDate::from_ymd_opt(2026, 9, 10),
        time: NaiveTime::from_hms_opt(9, 30, 0),
        contact_name: Some("Carla Méndez".to_string()),
        contact_phone: Some("555-0199".to_string()),
    };
    assert_eq!(first_invalid_step(&draft, today, now), None);

    // 2. El taller acepta y el técnico asignado inicia el trabajo
    assert!(validate_transition(
        AppointmentStatus::Pending,
        AppointmentStatus::Accepted,
        UserRole::Staff,
        false
    )
    .is_ok());
    assert!(validate_transition(
        AppointmentStatus::Accepted,
        AppointmentStatus::InProgress,
        UserRole::Technician,
        true
    )
    .is_ok());

    // 3. El checklist se deriva de la descripción del servicio
    let mut checklist = materialize_checklist(&[oil_service()]);
    assert_eq!(checklist.len(), 4);
    assert_eq!(checklist[0].section_title, "Lubricación");
    assert_eq!(checklist[2].section_title, "Inspección");

    // Sin ítems completados el registro no se puede guardar
    assert!(validate_for_save(&checklist).is_err());

    checklist[0].completed = true;
    checklist[1].completed = true;
    checklist[3].needs_replacement = true;
    assert!(validate_for_save(&checklist).is_ok());

    // 4. Marcar needs_replacement emite exactamente una alerta
    let baseline = materialize_checklist(&[oil_service()]);
    let alerts = replacement_alerts(500, &baseline, &checklist);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].checklist_index, 3);
    assert_eq!(alerts[0].section_title, "Inspección");

    // 5. Primera lista de piezas: captura el precio del catálogo
    let catalog: HashMap<i64, Part> = [part(1, "Filtro de aceite", 15), part(2, "Aceite 5W30", 40)]
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let first_save = merge_part_usages(
        &[
            PartUsageInput {
                part_id: 1,
                quantity_used: 1,
            },
            PartUsageInput {
                part_id: 2,
                quantity_used: 4,
            },
        ],
        &[],
        &catalog,
    )
    .unwrap();
    assert_eq!(first_save[0].unit_cost, Decimal::from(15));

    // La primera persistencia es la línea base: conciliar contra vacío
    // nunca se hace, y conciliar la línea base consigo misma es un no-op
    assert!(reconcile(&first_save, &first_save).is_empty());

    // 6. Edición posterior: más aceite y se devuelve el filtro
    let edited = merge_part_usages(
        &[PartUsageInput {
            part_id: 2,
            quantity_used: 5,
        }],
        &first_save,
        &catalog,
    )
    .unwrap();

    let adjustments = reconcile(&first_save, &edited);
    assert_eq!(adjustments.len(), 2);

    let filter = adjustments.iter().find(|a| a.part_id == 1).unwrap();
    assert_eq!(filter.direction, AdjustmentDirection::ReturnToStock);
    assert_eq!(filter.magnitude, 1);

    let oil = adjustments.iter().find(|a| a.part_id == 2).unwrap();
    assert_eq!(oil.direction, AdjustmentDirection::ConsumeFromStock);
    assert_eq!(oil.magnitude, 1);

    // El precio capturado del aceite no se recalcula en la edición
    assert_eq!(edited[0].unit_cost, Decimal::from(40));

    // 7. Solo el técnico asignado completa; el estado terminal es definitivo
    assert!(validate_transition(
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        UserRole::Technician,
        true
    )
    .is_ok());
    assert!(validate_transition(
        AppointmentStatus::Completed,
        AppointmentStatus::InProgress,
        UserRole::Staff,
        false
    )
    .is_err());
}

#[test]
fn test_recommendation_follows_vehicle_mileage() {
    let types = vec![
        ServiceType {
            price: Decimal::from(120),
            ..oil_service()
        },
        ServiceType {
            id: 2,
            name: "Servicio estándar".to_string(),
            description: String::new(),
            category: Some("standard".to_string()),
            price: Decimal::from(250),
            duration_estimate_minutes: 90,
        },
        ServiceType {
            id: 3,
            name: "Servicio premium".to_string(),
            description: String::new(),
            category: Some("premium".to_string()),
            price: Decimal::from(480),
            duration_estimate_minutes: 180,
        },
    ];

    assert_eq!(recommend_package(4_000, &types).unwrap().id, 1);
    assert_eq!(recommend_package(12_000, &types).unwrap().id, 2);
    assert_eq!(recommend_package(30_000, &types).unwrap().id, 3);
}

#[test]
fn test_reconcile_reversal_cancels_out() {
    let baseline = vec![PartUsage {
        part_id: 9,
        part_name: "Bujía".to_string(),
        quantity_used: 4,
        unit_cost: Decimal::from(8),
    }];
    let edited = vec![PartUsage {
        part_id: 9,
        part_name: "Bujía".to_string(),
        quantity_used: 6,
        unit_cost: Decimal::from(8),
    }];

    let forward = reconcile(&baseline, &edited);
    let backward = reconcile(&edited, &baseline);

    assert_eq!(forward.len(), 1);
    assert_eq!(backward.len(), 1);
    assert_eq!(forward[0].magnitude, backward[0].magnitude);
    assert_ne!(forward[0].direction, backward[0].direction);
}
