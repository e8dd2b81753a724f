//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las consultas SQL de una tabla o agregado.

pub mod appointment_repository;
pub mod maintenance_repository;
pub mod part_repository;
pub mod service_center_repository;
pub mod service_type_repository;
pub mod user_repository;
pub mod vehicle_repository;
