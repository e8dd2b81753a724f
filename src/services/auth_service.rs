//! Servicio de autenticación
//!
//! Login con verificación bcrypt. Una sesión ausente o inválida es una
//! precondición dura de las operaciones protegidas; la limpieza de
//! credenciales ocurre en un único punto fuera de este servicio.

use crate::models::auth::{LoginRequest, LoginResponse, UserInfo, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{info, warn};

pub struct AuthService {
    repository: UserRepository,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    /// Verifica credenciales y emite un token de acceso
    pub async fn login(
        &self,
        jwt: &JwtService,
        request: LoginRequest,
    ) -> AppResult<LoginResponse> {
        let user = match self.repository.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                warn!("🔒 Login fallido: email desconocido");
                return Ok(failed_login());
            }
        };

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            warn!("🔒 Login fallido para el usuario {}", user.id);
            return Ok(failed_login());
        }

        let role = UserRole::from_str(&user.role).ok_or_else(|| {
            AppError::Internal(format!("Rol desconocido en base de datos: {}", user.role))
        })?;

        let user_info = UserInfo {
            id: user.id,
            full_name: user.full_name.clone(),
            role,
            service_center_id: user.service_center_id,
        };

        let (token, expires_at) = jwt
            .generate_access_token(&user_info)
            .map_err(AppError::Jwt)?;

        info!("✅ Login exitoso: usuario {} rol {}", user.id, role.as_str());

        Ok(LoginResponse {
            success: true,
            token: Some(token),
            user_info: Some(user_info),
            message: None,
            expires_at: Some(expires_at),
        })
    }
}

fn failed_login() -> LoginResponse {
    LoginResponse {
        success: false,
        token: None,
        user_info: None,
        message: Some("Credenciales inválidas".to_string()),
        expires_at: None,
    }
}
