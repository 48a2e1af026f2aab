use colegio_core::AppError;
use colegio_db::PgPool;
use uuid::Uuid;

pub const USER_COLUMNS: &str =
    "id, nombre, email, role, is_validated, activo, creado_por, created_at, updated_at";

/// Keeps the ids that belong to validated estudiantes, in input order.
pub async fn filter_validated_estudiantes(
    db: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<Uuid>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let valid: Vec<Uuid> = sqlx::query_scalar(
        "SELECT id FROM users WHERE id = ANY($1) AND role = 'estudiante' AND is_validated = TRUE",
    )
    .bind(ids)
    .fetch_all(db)
    .await?;

    Ok(ids.iter().copied().filter(|id| valid.contains(id)).collect())
}
