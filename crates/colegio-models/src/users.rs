use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use colegio_core::serde::deserialize_optional_bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Docente,
    Estudiante,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Docente, UserRole::Estudiante];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Docente => "docente",
            UserRole::Estudiante => "estudiante",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "docente" => Ok(UserRole::Docente),
            "estudiante" => Ok(UserRole::Estudiante),
            other => Err(format!("Rol desconocido: {}", other)),
        }
    }
}

/// A user as exposed by the API. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub role: UserRole,
    pub is_validated: bool,
    pub activo: bool,
    pub creado_por: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

/// Populated reference to a docente or admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub role: UserRole,
}

/// Populated reference to an enrolled estudiante.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EstudianteRef {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UsuariosQuery {
    /// admin, docente or estudiante
    pub role: Option<String>,
    /// `true` or `false`
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    #[param(value_type = Option<String>)]
    pub is_validated: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsuariosResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub usuarios: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserActionResponse {
    pub ok: bool,
    pub msg: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendientesResponse {
    pub ok: bool,
    pub msg: String,
    pub pendientes: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str_is_case_insensitive() {
        assert_eq!("Docente".parse::<UserRole>(), Ok(UserRole::Docente));
        assert_eq!(" ADMIN ".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("estudiante".parse::<UserRole>(), Ok(UserRole::Estudiante));
        assert!("profesor".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_display_matches_serde() {
        for role in UserRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: Uuid::new_v4(),
            nombre: "Ana".to_string(),
            email: "ana@colegio.com".to_string(),
            role: UserRole::Estudiante,
            is_validated: false,
            activo: true,
            creado_por: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["isValidated"], false);
        assert_eq!(value["role"], "estudiante");
        assert!(value.get("password").is_none());
    }
}
