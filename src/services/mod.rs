//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: la máquina
//! de estados de citas, la validación de agenda, el flujo de reserva, el
//! constructor de registros de mantenimiento y la conciliación de inventario.

pub mod appointment_service;
pub mod assignment_service;
pub mod auth_service;
pub mod booking_service;
pub mod inventory_service;
pub mod jwt_service;
pub mod maintenance_service;
pub mod scheduling_service;
