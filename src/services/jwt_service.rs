//! Servicio JWT
//!
//! Generación y validación de tokens de acceso. El token lleva el contexto
//! de sesión completo (identidad, rol, centro) para que cada handler opere
//! con un contexto explícito en lugar de estado global.

use crate::models::auth::{JwtClaims, UserInfo, UserRole};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Servicio JWT
pub struct JwtService {
    algorithm: Algorithm,
    access_token_duration: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str, expiration_hours: u64) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::hours(expiration_hours as i64),
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// Genera un token de acceso y devuelve también su expiración
    pub fn generate_access_token(
        &self,
        user_info: &UserInfo,
    ) -> Result<(String, DateTime<Utc>), String> {
        let now = Utc::now();
        let exp = now + self.access_token_duration;

        let claims = JwtClaims {
            sub: user_info.id,
            full_name: user_info.full_name.clone(),
            role: user_info.role.as_str().to_string(),
            service_center_id: user_info.service_center_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map(|token| (token, exp))
            .map_err(|e| format!("Error generating access token: {}", e))
    }

    /// Valida y decodifica un token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, String> {
        let validation = Validation::new(self.algorithm);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))
    }

    /// Obtiene el contexto de sesión completo desde el token
    pub fn get_user_info(&self, token: &str) -> Result<UserInfo, String> {
        let claims = self.validate_token(token)?;

        Ok(UserInfo {
            id: claims.sub,
            full_name: claims.full_name,
            role: UserRole::from_str(&claims.role).ok_or("Invalid role in token")?,
            service_center_id: claims.service_center_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret", 24)
    }

    fn technician() -> UserInfo {
        UserInfo {
            id: 42,
            full_name: "Luis Ramírez".to_string(),
            role: UserRole::Technician,
            service_center_id: Some(3),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = service();

        let (token, expires_at) = jwt_service.generate_access_token(&technician()).unwrap();
        assert!(!token.is_empty());
        assert!(expires_at > Utc::now());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "technician");
        assert_eq!(claims.service_center_id, Some(3));
    }

    #[test]
    fn test_get_user_info_roundtrip() {
        let jwt_service = service();
        let (token, _) = jwt_service.generate_access_token(&technician()).unwrap();

        let info = jwt_service.get_user_info(&token).unwrap();
        assert_eq!(info.id, 42);
        assert_eq!(info.role, UserRole::Technician);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let jwt_service = service();
        let other = JwtService::new("another-secret", 24);

        let (token, _) = other.generate_access_token(&technician()).unwrap();
        assert!(jwt_service.validate_token(&token).is_err());
    }
}
