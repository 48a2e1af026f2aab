use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use colegio_core::{AppError, hash_password};
use colegio_models::User;

use crate::metrics::track_user_registered;
use crate::modules::auth::service::normalize_email;
use crate::utils::academic::non_blank;
use crate::utils::auth_helpers::USER_COLUMNS;

use super::model::{CreateDocenteDto, UpdateDocenteDto};

pub struct DocenteService;

fn map_email_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::conflict(anyhow!("El correo ya está registrado"));
    }
    AppError::from(e)
}

impl DocenteService {
    /// Docentes created by an admin are validated from the start.
    #[instrument(skip(db, dto))]
    pub async fn create_docente(
        db: &PgPool,
        admin_id: Uuid,
        dto: CreateDocenteDto,
    ) -> Result<User, AppError> {
        let (Some(nombre), Some(email), Some(password)) = (
            non_blank(dto.nombre.as_deref()),
            non_blank(dto.email.as_deref()),
            dto.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::bad_request(anyhow!(
                "Todos los campos son obligatorios"
            )));
        };

        let email = normalize_email(&email);

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&email)
            .fetch_one(db)
            .await?;

        if exists {
            return Err(AppError::conflict(anyhow!("El correo ya está registrado")));
        }

        let hashed_password = hash_password(&password)?;

        let docente = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (nombre, email, password, role, is_validated, creado_por)
             VALUES ($1, $2, $3, 'docente', TRUE, $4)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&nombre)
        .bind(&email)
        .bind(&hashed_password)
        .bind(admin_id)
        .fetch_one(db)
        .await
        .map_err(map_email_conflict)?;

        track_user_registered(docente.role.as_str());
        tracing::info!(docente_id = %docente.id, "Docente creado");

        Ok(docente)
    }

    #[instrument(skip(db))]
    pub async fn get_docentes(db: &PgPool) -> Result<Vec<User>, AppError> {
        let docentes = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE role = 'docente' ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        Ok(docentes)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_docente(
        db: &PgPool,
        docente_id: Uuid,
        dto: UpdateDocenteDto,
    ) -> Result<User, AppError> {
        let hashed_password = match dto.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let email = non_blank(dto.email.as_deref()).map(|e| normalize_email(&e));

        let docente = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                nombre = COALESCE($2, nombre),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                activo = COALESCE($5, activo),
                updated_at = NOW()
             WHERE id = $1 AND role = 'docente'
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(docente_id)
        .bind(non_blank(dto.nombre.as_deref()))
        .bind(email)
        .bind(hashed_password)
        .bind(dto.activo)
        .fetch_optional(db)
        .await
        .map_err(map_email_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow!("Docente no encontrado")))?;

        Ok(docente)
    }

    #[instrument(skip(db))]
    pub async fn delete_docente(db: &PgPool, docente_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'docente'")
            .bind(docente_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Docente no encontrado")));
        }

        Ok(())
    }
}
