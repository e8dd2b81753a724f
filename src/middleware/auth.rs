//! Extracción del contexto de sesión
//!
//! AuthUser valida el Bearer token y entrega el contexto de sesión
//! explícito (identidad, rol, centro) a cada handler. Una sesión ausente
//! o inválida es Unauthorized aquí mismo, antes de tocar la base de datos;
//! este módulo nunca limpia credenciales por su cuenta.

use crate::models::auth::UserInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use http::header::AUTHORIZATION;

/// Contexto de sesión autenticado de la petición
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserInfo);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Falta el header Authorization".to_string())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("El header Authorization debe ser 'Bearer <token>'".to_string())
        })?;

        let user_info = state
            .jwt
            .get_user_info(token)
            .map_err(AppError::Unauthorized)?;

        Ok(AuthUser(user_info))
    }
}
