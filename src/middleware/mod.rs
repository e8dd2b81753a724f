//! Middleware de la aplicación
//!
//! CORS y extracción del contexto de sesión autenticado.

pub mod auth;
pub mod cors;
