//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod appointment;
pub mod auth;
pub mod maintenance;
pub mod part;
pub mod service_center;
pub mod service_type;
pub mod vehicle;
