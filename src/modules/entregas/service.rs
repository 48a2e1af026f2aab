use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::notificaciones::NotificacionTipo;

use crate::metrics::{
    track_entrega_calificada, track_entrega_registrada, track_notificaciones_enviadas,
};
use crate::utils::academic::{
    format_promedio, is_http_url, is_on_or_after_today, is_valid_calificacion, non_blank,
};

use super::model::{
    CalificarEntregaDto, Entrega, EntregaDetalle, EntregaEstado, RegistrarEntregaDto,
    ResumenActividad,
};

const ENTREGA_COLUMNS: &str = "e.id, e.actividad_id, e.clase_id, e.curso_id, e.estudiante_id, \
     e.archivo_url, e.fecha_entrega, e.calificacion, e.observaciones, e.estado, \
     e.fecha_revision, e.notificacion_id, e.created_at, e.updated_at";

const DETALLE_JOINS: &str = "u.nombre AS estudiante_nombre, u.email AS estudiante_email, \
     a.titulo AS actividad_titulo, a.fecha_entrega AS actividad_fecha_entrega \
     FROM entregas e \
     JOIN users u ON u.id = e.estudiante_id \
     JOIN actividades a ON a.id = e.actividad_id";

const ENTREGA_DUPLICADA: &str = "Ya registraste una entrega para esta actividad";

#[derive(FromRow)]
struct ActividadDestino {
    curso_id: Uuid,
    clase_id: Option<Uuid>,
    fecha_entrega: DateTime<Utc>,
}

#[derive(FromRow)]
struct EntregaPropietario {
    estudiante_id: Uuid,
    actividad_id: Uuid,
    docente_id: Uuid,
    titulo: String,
}

pub struct EntregaService;

impl EntregaService {
    async fn get_entrega(db: &PgPool, entrega_id: Uuid) -> Result<Entrega, AppError> {
        sqlx::query_as::<_, Entrega>(&format!(
            "SELECT {} FROM entregas e WHERE e.id = $1",
            ENTREGA_COLUMNS
        ))
        .bind(entrega_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Entrega no encontrada")))
    }

    /// Estudiantes submit against actividades of their clase, or of their
    /// curso when the actividad has no clase. One entrega per actividad.
    #[instrument(skip(db, dto))]
    pub async fn registrar_entrega(
        db: &PgPool,
        estudiante_id: Uuid,
        dto: RegistrarEntregaDto,
    ) -> Result<Entrega, AppError> {
        let Some(actividad_id) = dto.actividad_id else {
            return Err(AppError::bad_request(anyhow!(
                "Faltan datos obligatorios: actividadId o estudianteId"
            )));
        };

        let actividad = sqlx::query_as::<_, ActividadDestino>(
            "SELECT curso_id, clase_id, fecha_entrega FROM actividades WHERE id = $1",
        )
        .bind(actividad_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Actividad no encontrada")))?;

        let inscrito: bool = match actividad.clase_id {
            Some(clase_id) => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM clase_estudiantes
                               WHERE clase_id = $1 AND estudiante_id = $2)",
            )
            .bind(clase_id)
            .bind(estudiante_id)
            .fetch_one(db)
            .await?,
            None => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM curso_estudiantes
                               WHERE curso_id = $1 AND estudiante_id = $2)",
            )
            .bind(actividad.curso_id)
            .bind(estudiante_id)
            .fetch_one(db)
            .await?,
        };
        if !inscrito {
            return Err(AppError::forbidden(
                "No estás asignado a esta clase. No puedes entregar esta actividad.".to_string(),
            ));
        }

        let archivo_url = non_blank(dto.archivo_url.as_deref());
        if let Some(url) = &archivo_url
            && !is_http_url(url)
        {
            return Err(AppError::bad_request(anyhow!("El archivo debe ser una URL válida")));
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM entregas WHERE actividad_id = $1 AND estudiante_id = $2)",
        )
        .bind(actividad_id)
        .bind(estudiante_id)
        .fetch_one(db)
        .await?;
        if exists {
            return Err(AppError::conflict(anyhow!(ENTREGA_DUPLICADA)));
        }

        let estado = if is_on_or_after_today(actividad.fecha_entrega, Utc::now()) {
            EntregaEstado::Entregado
        } else {
            EntregaEstado::Vencido
        };

        let entrega = sqlx::query_as::<_, Entrega>(
            "INSERT INTO entregas (actividad_id, clase_id, curso_id, estudiante_id, archivo_url, estado)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, actividad_id, clase_id, curso_id, estudiante_id, archivo_url,
                       fecha_entrega, calificacion, observaciones, estado, fecha_revision,
                       notificacion_id, created_at, updated_at",
        )
        .bind(actividad_id)
        .bind(actividad.clase_id)
        .bind(actividad.curso_id)
        .bind(estudiante_id)
        .bind(&archivo_url)
        .bind(estado)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow!(ENTREGA_DUPLICADA));
            }
            AppError::database(e)
        })?;

        track_entrega_registrada(estado.as_str());
        tracing::info!(
            entrega_id = %entrega.id,
            actividad_id = %actividad_id,
            estado = estado.as_str(),
            "Entrega registrada"
        );

        Ok(entrega)
    }

    #[instrument(skip(db))]
    pub async fn get_entregas_actividad(
        db: &PgPool,
        actividad_id: Uuid,
    ) -> Result<Vec<EntregaDetalle>, AppError> {
        let entregas = sqlx::query_as::<_, EntregaDetalle>(&format!(
            "SELECT {}, {} WHERE e.actividad_id = $1 ORDER BY e.fecha_entrega ASC",
            ENTREGA_COLUMNS, DETALLE_JOINS
        ))
        .bind(actividad_id)
        .fetch_all(db)
        .await?;

        Ok(entregas)
    }

    #[instrument(skip(db))]
    pub async fn get_entregas_curso(
        db: &PgPool,
        curso_id: Uuid,
    ) -> Result<Vec<EntregaDetalle>, AppError> {
        let entregas = sqlx::query_as::<_, EntregaDetalle>(&format!(
            "SELECT {}, {} WHERE e.curso_id = $1 ORDER BY e.fecha_entrega ASC",
            ENTREGA_COLUMNS, DETALLE_JOINS
        ))
        .bind(curso_id)
        .fetch_all(db)
        .await?;

        Ok(entregas)
    }

    #[instrument(skip(db))]
    pub async fn get_entregas_estudiante(
        db: &PgPool,
        estudiante_id: Uuid,
    ) -> Result<Vec<EntregaDetalle>, AppError> {
        let entregas = sqlx::query_as::<_, EntregaDetalle>(&format!(
            "SELECT {}, {} WHERE e.estudiante_id = $1 ORDER BY e.fecha_entrega DESC",
            ENTREGA_COLUMNS, DETALLE_JOINS
        ))
        .bind(estudiante_id)
        .fetch_all(db)
        .await?;

        Ok(entregas)
    }

    /// Count and average of the reviewed entregas of an actividad.
    pub async fn resumen_actividad(
        db: &PgPool,
        actividad_id: Uuid,
    ) -> Result<ResumenActividad, AppError> {
        let (cantidad_revisadas, promedio): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(calificacion)
             FROM entregas
             WHERE actividad_id = $1 AND estado = 'revisado'",
        )
        .bind(actividad_id)
        .fetch_one(db)
        .await?;

        Ok(ResumenActividad {
            cantidad_revisadas,
            promedio_calificaciones: format_promedio(promedio),
        })
    }

    /// Grades an entrega of the caller's actividad and notifies the estudiante.
    #[instrument(skip(db, dto))]
    pub async fn calificar_entrega(
        db: &PgPool,
        docente_id: Uuid,
        entrega_id: Uuid,
        dto: CalificarEntregaDto,
    ) -> Result<(Entrega, ResumenActividad), AppError> {
        let calificacion = dto
            .calificacion
            .as_ref()
            .and_then(|c| c.as_f64())
            .filter(|c| is_valid_calificacion(*c))
            .ok_or_else(|| {
                AppError::bad_request(anyhow!("La calificación debe estar entre 0 y 20."))
            })?;

        let propietario = sqlx::query_as::<_, EntregaPropietario>(
            "SELECT e.estudiante_id, e.actividad_id, a.docente_id, a.titulo
             FROM entregas e
             JOIN actividades a ON a.id = e.actividad_id
             WHERE e.id = $1",
        )
        .bind(entrega_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Entrega no encontrada")))?;

        if propietario.docente_id != docente_id {
            return Err(AppError::forbidden(
                "No tienes permiso para calificar esta entrega.".to_string(),
            ));
        }

        let mut tx = db.begin().await?;

        let notificacion_id: Uuid = sqlx::query_scalar(
            "INSERT INTO notificaciones (usuario_id, titulo, mensaje, tipo, entrega_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(propietario.estudiante_id)
        .bind("Entrega calificada")
        .bind(format!(
            "Tu entrega para \"{}\" fue calificada con {}/20.",
            propietario.titulo, calificacion
        ))
        .bind(NotificacionTipo::Nota)
        .bind(entrega_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE entregas SET
                calificacion = $2,
                observaciones = COALESCE($3, observaciones),
                estado = 'revisado',
                fecha_revision = NOW(),
                notificacion_id = $4,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(entrega_id)
        .bind(calificacion)
        .bind(dto.observaciones.as_deref().map(str::trim))
        .bind(notificacion_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        track_entrega_calificada(calificacion);
        track_notificaciones_enviadas("nota", 1);
        tracing::info!(entrega_id = %entrega_id, calificacion, "Entrega calificada");

        let entrega = Self::get_entrega(db, entrega_id).await?;
        let resumen = Self::resumen_actividad(db, propietario.actividad_id).await?;

        Ok((entrega, resumen))
    }
}
