use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use colegio_core::AppError;
use colegio_models::{User, UserRole};

use crate::middleware::auth::AuthUser;
use crate::utils::auth_helpers::USER_COLUMNS;

pub struct UsuarioService;

impl UsuarioService {
    /// Parses the requested role and applies the docente restriction.
    pub fn resolve_role(auth_user: &AuthUser, role: Option<&str>) -> Result<UserRole, AppError> {
        let role = role
            .and_then(|r| r.parse::<UserRole>().ok())
            .ok_or_else(|| {
                AppError::bad_request(anyhow!(
                    "Parámetro 'role' requerido y debe ser uno de: admin, docente, estudiante"
                ))
            })?;

        if auth_user.role() == Some(UserRole::Docente) && role != UserRole::Estudiante {
            return Err(AppError::forbidden("Acceso denegado para docentes".to_string()));
        }

        Ok(role)
    }

    /// Docentes only ever see validated estudiantes; admins filter estudiantes only.
    pub fn resolve_is_validated(
        auth_user: &AuthUser,
        role: UserRole,
        requested: Option<bool>,
    ) -> Option<bool> {
        match auth_user.role() {
            Some(UserRole::Docente) => Some(true),
            _ if role == UserRole::Estudiante => requested,
            _ => None,
        }
    }

    #[instrument(skip(db))]
    pub async fn get_usuarios(
        db: &PgPool,
        role: UserRole,
        is_validated: Option<bool>,
    ) -> Result<Vec<User>, AppError> {
        let usuarios = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users
             WHERE role = $1 AND ($2::boolean IS NULL OR is_validated = $2)
             ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .bind(role)
        .bind(is_validated)
        .fetch_all(db)
        .await?;

        Ok(usuarios)
    }
}
