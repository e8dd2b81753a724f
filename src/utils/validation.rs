//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos usados por los DTOs de la API.

use chrono::NaiveDate;
use validator::ValidationError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que una lista de ids no esté vacía y no tenga duplicados
pub fn validate_id_set(ids: &[i64]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        return Err(ValidationError::new("empty_id_set"));
    }
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(*id) {
            let mut error = ValidationError::new("duplicate_id");
            error.add_param("id".into(), id);
            return Err(error);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-09-15").is_ok());
        assert!(validate_date("15/09/2026").is_err());
    }

    #[test]
    fn test_validate_id_set() {
        assert!(validate_id_set(&[1, 2, 3]).is_ok());
        assert!(validate_id_set(&[]).is_err());
        assert!(validate_id_set(&[1, 1]).is_err());
    }
}
