//! Modelos de autenticación
//!
//! Roles del sistema, usuario autenticado y claims del JWT.
//! El contexto de sesión se pasa explícito a cada operación;
//! ningún servicio lee estado ambiental de sesión.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Staff,
    Technician,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Staff => "staff",
            UserRole::Technician => "technician",
            UserRole::Manager => "manager",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(UserRole::Customer),
            "staff" => Some(UserRole::Staff),
            "technician" => Some(UserRole::Technician),
            "manager" => Some(UserRole::Manager),
            _ => None,
        }
    }
}

/// Usuario persistido - mapea a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub service_center_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Información del usuario autenticado (contexto de sesión explícito)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub full_name: String,
    pub role: UserRole,
    pub service_center_id: Option<i64>,
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: i64, // user_id
    pub full_name: String,
    pub role: String,
    pub service_center_id: Option<i64>,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Request de login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response de login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub user_info: Option<UserInfo>,
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
