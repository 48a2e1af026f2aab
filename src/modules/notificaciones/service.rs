use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use colegio_core::{AppError, PaginationMeta, PaginationParams};

use super::model::Notificacion;

const NOTIFICACION_COLUMNS: &str =
    "id, usuario_id, titulo, mensaje, tipo, entrega_id, leido, fecha, created_at, updated_at";

pub struct NotificacionPage {
    pub notificaciones: Vec<Notificacion>,
    pub no_leidas: i64,
    pub meta: PaginationMeta,
}

pub struct NotificacionService;

impl NotificacionService {
    /// The caller's notificaciones, newest first. `no_leidas` ignores the `leido` filter.
    #[instrument(skip(db, pagination))]
    pub async fn get_notificaciones(
        db: &PgPool,
        usuario_id: Uuid,
        leido: Option<bool>,
        pagination: &PaginationParams,
    ) -> Result<NotificacionPage, AppError> {
        let (total, no_leidas): (i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*) FILTER (WHERE $2::boolean IS NULL OR leido = $2),
                COUNT(*) FILTER (WHERE leido = FALSE)
             FROM notificaciones
             WHERE usuario_id = $1",
        )
        .bind(usuario_id)
        .bind(leido)
        .fetch_one(db)
        .await?;

        let notificaciones = sqlx::query_as::<_, Notificacion>(&format!(
            "SELECT {} FROM notificaciones
             WHERE usuario_id = $1 AND ($2::boolean IS NULL OR leido = $2)
             ORDER BY fecha DESC, id
             LIMIT $3 OFFSET $4",
            NOTIFICACION_COLUMNS
        ))
        .bind(usuario_id)
        .bind(leido)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(NotificacionPage {
            notificaciones,
            no_leidas,
            meta: PaginationMeta::new(total, pagination),
        })
    }

    /// Another user's notificacion is reported as missing.
    #[instrument(skip(db))]
    pub async fn marcar_leida(
        db: &PgPool,
        usuario_id: Uuid,
        notificacion_id: Uuid,
    ) -> Result<Notificacion, AppError> {
        sqlx::query_as::<_, Notificacion>(&format!(
            "UPDATE notificaciones SET leido = TRUE, updated_at = NOW()
             WHERE id = $1 AND usuario_id = $2
             RETURNING {}",
            NOTIFICACION_COLUMNS
        ))
        .bind(notificacion_id)
        .bind(usuario_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Notificación no encontrada")))
    }

    #[instrument(skip(db))]
    pub async fn marcar_todas_leidas(db: &PgPool, usuario_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notificaciones SET leido = TRUE, updated_at = NOW()
             WHERE usuario_id = $1 AND leido = FALSE",
        )
        .bind(usuario_id)
        .execute(db)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use colegio_models::UserRole;

    use crate::utils::test_fixtures::insert_user;

    async fn insert_notificacion(pool: &PgPool, usuario_id: Uuid, mensaje: &str) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO notificaciones (usuario_id, mensaje, fecha)
             VALUES ($1, $2, NOW() - (SELECT COUNT(*) FROM notificaciones) * INTERVAL '1 minute')
             RETURNING id",
        )
        .bind(usuario_id)
        .bind(mensaje)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_listing_is_paginated_newest_first(pool: PgPool) {
        let usuario = insert_user(&pool, UserRole::Estudiante, true).await;
        let primera = insert_notificacion(&pool, usuario, "uno").await;
        insert_notificacion(&pool, usuario, "dos").await;
        let ultima = insert_notificacion(&pool, usuario, "tres").await;
        let otro = insert_user(&pool, UserRole::Estudiante, true).await;
        insert_notificacion(&pool, otro, "ajena").await;

        let params = PaginationParams {
            limit: Some(2),
            page: Some(1),
        };
        let page = NotificacionService::get_notificaciones(&pool, usuario, None, &params)
            .await
            .unwrap();

        assert_eq!(page.notificaciones.len(), 2);
        assert_eq!(page.notificaciones[0].id, primera);
        assert_eq!(page.no_leidas, 3);
        assert_eq!(page.meta.total, 3);
        assert!(page.meta.has_more);

        let params = PaginationParams {
            limit: Some(2),
            page: Some(2),
        };
        let page = NotificacionService::get_notificaciones(&pool, usuario, None, &params)
            .await
            .unwrap();
        assert_eq!(page.notificaciones.len(), 1);
        assert_eq!(page.notificaciones[0].id, ultima);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_marcar_leida(pool: PgPool) {
        let usuario = insert_user(&pool, UserRole::Estudiante, true).await;
        let otro = insert_user(&pool, UserRole::Estudiante, true).await;
        let notificacion = insert_notificacion(&pool, usuario, "hola").await;
        insert_notificacion(&pool, usuario, "adiós").await;

        let err = NotificacionService::marcar_leida(&pool, otro, notificacion)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Notificación no encontrada");

        let leida = NotificacionService::marcar_leida(&pool, usuario, notificacion)
            .await
            .unwrap();
        assert!(leida.leido);

        let page = NotificacionService::get_notificaciones(
            &pool,
            usuario,
            Some(true),
            &PaginationParams::default(),
        )
        .await
        .unwrap();
        assert_eq!(page.notificaciones.len(), 1);
        assert_eq!(page.no_leidas, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_marcar_todas_leidas(pool: PgPool) {
        let usuario = insert_user(&pool, UserRole::Docente, true).await;
        insert_notificacion(&pool, usuario, "a").await;
        insert_notificacion(&pool, usuario, "b").await;

        assert_eq!(
            NotificacionService::marcar_todas_leidas(&pool, usuario)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            NotificacionService::marcar_todas_leidas(&pool, usuario)
                .await
                .unwrap(),
            0
        );
    }
}
