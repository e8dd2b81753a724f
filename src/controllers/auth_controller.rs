use crate::models::auth::{LoginRequest, LoginResponse, UserInfo};
use crate::services::auth_service::AuthService;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::AppResult;
use sqlx::PgPool;

pub struct AuthController {
    service: AuthService,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: AuthService::new(pool),
        }
    }

    pub async fn login(&self, jwt: &JwtService, request: LoginRequest) -> AppResult<LoginResponse> {
        self.service.login(jwt, request).await
    }

    /// Identidad del actor autenticado, tal como viene del token
    pub fn me(&self, ctx: UserInfo) -> UserInfo {
        ctx
    }
}
