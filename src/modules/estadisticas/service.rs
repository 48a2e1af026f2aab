use sqlx::PgPool;
use tracing::instrument;

use colegio_core::AppError;
use colegio_models::estadisticas::Estadisticas;

pub struct EstadisticasService;

impl EstadisticasService {
    /// Active means validated and `activo`.
    #[instrument(skip(db))]
    pub async fn get_estadisticas(db: &PgPool) -> Result<Estadisticas, AppError> {
        let estadisticas = sqlx::query_as::<_, Estadisticas>(
            r#"SELECT
                COUNT(*) AS usuarios_registrados,
                COUNT(*) FILTER (WHERE NOT is_validated) AS pendientes_validacion,
                COUNT(*) FILTER (WHERE role = 'docente' AND is_validated AND activo) AS docentes_activos,
                COUNT(*) FILTER (WHERE role = 'estudiante' AND is_validated AND activo) AS estudiantes_activos,
                COUNT(*) FILTER (WHERE role = 'admin' AND is_validated AND activo) AS admins_activos,
                COUNT(*) FILTER (WHERE NOT activo) AS usuarios_inactivos
               FROM users"#,
        )
        .fetch_one(db)
        .await?;

        Ok(estadisticas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colegio_models::UserRole;

    use crate::utils::test_fixtures::insert_user;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_empty_database(pool: PgPool) {
        let stats = EstadisticasService::get_estadisticas(&pool).await.unwrap();
        assert_eq!(stats.usuarios_registrados, 0);
        assert_eq!(stats.usuarios_inactivos, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_counts(pool: PgPool) {
        insert_user(&pool, UserRole::Admin, true).await;
        insert_user(&pool, UserRole::Docente, true).await;
        let inactive = insert_user(&pool, UserRole::Docente, true).await;
        insert_user(&pool, UserRole::Estudiante, true).await;
        insert_user(&pool, UserRole::Estudiante, false).await;
        insert_user(&pool, UserRole::Estudiante, false).await;

        sqlx::query("UPDATE users SET activo = FALSE WHERE id = $1")
            .bind(inactive)
            .execute(&pool)
            .await
            .unwrap();

        let stats = EstadisticasService::get_estadisticas(&pool).await.unwrap();
        assert_eq!(stats.usuarios_registrados, 6);
        assert_eq!(stats.pendientes_validacion, 2);
        assert_eq!(stats.docentes_activos, 1);
        assert_eq!(stats.estudiantes_activos, 1);
        assert_eq!(stats.admins_activos, 1);
        assert_eq!(stats.usuarios_inactivos, 1);
    }
}
