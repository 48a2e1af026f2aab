use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::User;

use crate::metrics::track_user_validated;
use crate::utils::auth_helpers::USER_COLUMNS;

pub struct AdminService;

impl AdminService {
    #[instrument(skip(db))]
    pub async fn validar_usuario(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        let is_validated: bool =
            sqlx::query_scalar("SELECT is_validated FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("Usuario no encontrado")))?;

        if is_validated {
            return Err(AppError::bad_request(anyhow!("El usuario ya está validado")));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_validated = TRUE, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_one(db)
        .await?;

        track_user_validated();
        tracing::info!(user_id = %user.id, role = %user.role, "Usuario validado");

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_pendientes(db: &PgPool) -> Result<Vec<User>, AppError> {
        let pendientes = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users
             WHERE role = 'estudiante' AND is_validated = FALSE
             ORDER BY created_at ASC",
            USER_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        Ok(pendientes)
    }

    /// Deleting the row cascades to enrolments, entregas and notificaciones.
    #[instrument(skip(db))]
    pub async fn rechazar_usuario(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Usuario no encontrado")))?;

        tracing::info!(user_id = %user.id, "Usuario rechazado");

        Ok(user)
    }
}
