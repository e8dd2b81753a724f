//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use crate::config::environment::EnvironmentConfig;
use crate::services::jwt_service::JwtService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let jwt = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expiration));
        Self { pool, config, jwt }
    }
}
