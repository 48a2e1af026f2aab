use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use colegio_auth::Claims;

use crate::users::User;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "El nombre es demasiado largo"))]
    pub nombre: Option<String>,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub ok: bool,
    pub msg: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub ok: bool,
    pub msg: String,
    pub user: User,
}

/// Identity carried by the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub is_validated: bool,
}

impl From<&Claims> for SessionUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            role: claims.role.clone(),
            is_validated: claims.is_validated,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub ok: bool,
    pub msg: String,
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let dto = RegisterRequest {
            nombre: None,
            email: "no-es-correo".to_string(),
            password: "123".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_register_nombre_is_optional() {
        let dto: RegisterRequest =
            serde_json::from_str(r#"{"email":"ana@colegio.com","password":"secreto"}"#).unwrap();
        assert!(dto.nombre.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_session_user_from_claims() {
        let claims = Claims {
            sub: "abc".to_string(),
            email: "doc@colegio.com".to_string(),
            role: "docente".to_string(),
            is_validated: true,
            exp: 0,
            iat: 0,
        };
        let session = SessionUser::from(&claims);
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["isValidated"], true);
        assert_eq!(value["role"], "docente");
    }
}
