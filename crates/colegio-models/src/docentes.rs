use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use colegio_core::serde::deserialize_optional_text;

use crate::users::User;

/// All fields are checked for presence by the service so that a missing one
/// answers 400 with a single message. Blank values count as missing and skip
/// the format rules.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocenteDto {
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub nombre: Option<String>,
    #[serde(default, alias = "correo", deserialize_with = "deserialize_optional_text")]
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDocenteDto {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, alias = "correo")]
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocenteResponse {
    pub ok: bool,
    pub msg: String,
    pub docente: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocentesResponse {
    pub ok: bool,
    pub docentes: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correo_alias() {
        let dto: CreateDocenteDto = serde_json::from_str(
            r#"{"nombre":"Luis","correo":"luis@colegio.com","password":"secreto"}"#,
        )
        .unwrap();
        assert_eq!(dto.email.as_deref(), Some("luis@colegio.com"));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let dto: CreateDocenteDto = serde_json::from_str(r#"{"nombre":"Luis"}"#).unwrap();
        assert!(dto.email.is_none());
        assert!(dto.password.is_none());
    }

    #[test]
    fn test_blank_fields_skip_format_rules() {
        let dto: CreateDocenteDto = serde_json::from_str(
            r#"{"nombre":"Ana","email":"","password":"secreto123"}"#,
        )
        .unwrap();
        assert!(dto.email.is_none());
        assert!(dto.validate().is_ok());
    }
}
