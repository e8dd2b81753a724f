//! Backend del centro de servicio automotriz
//!
//! Expone los módulos de la aplicación como librería para que los tests
//! de integración puedan ejercitar los servicios directamente.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
