use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_core::serde::NumberOrText;
use colegio_models::notificaciones::NotificacionTipo;

use crate::metrics::{track_actividad_created, track_notificaciones_enviadas};
use crate::utils::academic::{
    filter_value, is_on_or_after_today, is_valid_ponderacion, non_blank, parse_fecha,
};

use super::model::{
    Actividad, ActividadDetalle, ActividadEstado, ActividadTipo, ActividadesQuery,
    CreateActividadDto, Lapso, Recurso, RecursoInput, UpdateActividadDto,
};

const ACTIVIDAD_COLUMNS: &str = "a.id, a.titulo, a.descripcion, a.tipo, a.fecha_entrega, \
     a.ponderacion, a.materia, a.lapso, a.curso_id, a.clase_id, a.docente_id, a.recursos, \
     a.estado, a.notificada, \
     ARRAY(SELECT an.estudiante_id FROM actividad_notificados an \
           WHERE an.actividad_id = a.id ORDER BY an.created_at) AS notificada_a, \
     a.created_at, a.updated_at";

const DETALLE_JOINS: &str = "d.nombre AS docente_nombre, d.email AS docente_email, \
     cu.nombre AS curso_nombre, cu.seccion AS curso_seccion, cl.nombre AS clase_nombre \
     FROM actividades a \
     LEFT JOIN users d ON d.id = a.docente_id \
     LEFT JOIN cursos cu ON cu.id = a.curso_id \
     LEFT JOIN clases cl ON cl.id = a.clase_id";

const FECHA_INVALIDA: &str = "Fecha de entrega inválida o pasada.";
const LAPSO_INVALIDO: &str = "Lapso académico inválido.";
const TIPO_INVALIDO: &str = "Tipo de actividad inválido.";
const ESTADO_INVALIDO: &str = "Estado de actividad inválido.";

fn actividad_not_found() -> AppError {
    AppError::not_found(anyhow!("Actividad no encontrada."))
}

fn curso_not_found() -> AppError {
    AppError::not_found(anyhow!("Curso no encontrado."))
}

fn parse_enum<T: FromStr>(value: &str, message: &'static str) -> Result<T, AppError> {
    value
        .parse::<T>()
        .map_err(|_| AppError::bad_request(anyhow!(message)))
}

fn parse_filter<T: FromStr>(value: Option<&str>, message: &'static str) -> Result<Option<T>, AppError> {
    filter_value(value)
        .map(|v| parse_enum::<T>(v, message))
        .transpose()
}

fn parse_id_filter(value: Option<&str>) -> Result<Option<Uuid>, AppError> {
    filter_value(value)
        .map(|v| Uuid::parse_str(v).map_err(|_| AppError::bad_request(anyhow!("ID inválido"))))
        .transpose()
}

fn parse_fecha_entrega(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
    parse_fecha(value)
        .filter(|fecha| is_on_or_after_today(*fecha, now))
        .ok_or_else(|| AppError::bad_request(anyhow!(FECHA_INVALIDA)))
}

fn parse_ponderacion(value: &NumberOrText, message: &'static str) -> Result<f64, AppError> {
    value
        .as_f64()
        .filter(|p| is_valid_ponderacion(*p))
        .ok_or_else(|| AppError::bad_request(anyhow!(message)))
}

fn into_recursos(recursos: Vec<RecursoInput>) -> Vec<Recurso> {
    recursos
        .into_iter()
        .filter_map(RecursoInput::into_recurso)
        .collect()
}

pub struct ActividadService;

impl ActividadService {
    async fn find(db: &PgPool, actividad_id: Uuid) -> Result<Option<Actividad>, AppError> {
        let actividad = sqlx::query_as::<_, Actividad>(&format!(
            "SELECT {} FROM actividades a WHERE a.id = $1",
            ACTIVIDAD_COLUMNS
        ))
        .bind(actividad_id)
        .fetch_optional(db)
        .await?;
        Ok(actividad)
    }

    #[instrument(skip(db))]
    pub async fn get_actividad(db: &PgPool, actividad_id: Uuid) -> Result<Actividad, AppError> {
        Self::find(db, actividad_id)
            .await?
            .ok_or_else(actividad_not_found)
    }

    /// Loads the actividad and rejects callers that are not its docente.
    async fn get_owned(
        db: &PgPool,
        docente_id: Uuid,
        actividad_id: Uuid,
        forbidden: &'static str,
    ) -> Result<Actividad, AppError> {
        let actividad = Self::get_actividad(db, actividad_id).await?;
        if actividad.docente_id != docente_id {
            return Err(AppError::forbidden(forbidden.to_string()));
        }
        Ok(actividad)
    }

    async fn curso_exists(db: &PgPool, curso_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cursos WHERE id = $1)")
            .bind(curso_id)
            .fetch_one(db)
            .await?;
        Ok(exists)
    }

    async fn ensure_clase_in_curso(
        db: &PgPool,
        clase_id: Uuid,
        curso_id: Uuid,
    ) -> Result<(), AppError> {
        let belongs: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM clases WHERE id = $1 AND curso_id = $2)",
        )
        .bind(clase_id)
        .bind(curso_id)
        .fetch_one(db)
        .await?;

        if !belongs {
            return Err(AppError::bad_request(anyhow!("La clase no pertenece al curso.")));
        }
        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn create_actividad(
        db: &PgPool,
        docente_id: Uuid,
        dto: CreateActividadDto,
    ) -> Result<Actividad, AppError> {
        let (
            Some(titulo),
            Some(tipo),
            Some(fecha_entrega),
            Some(ponderacion),
            Some(curso_id),
            Some(materia),
            Some(lapso),
        ) = (
            non_blank(dto.titulo.as_deref()),
            non_blank(dto.tipo.as_deref()),
            non_blank(dto.fecha_entrega.as_deref()),
            dto.ponderacion.as_ref().filter(|p| p.is_present()),
            dto.curso_id,
            non_blank(dto.materia.as_deref()),
            non_blank(dto.lapso.as_deref()),
        ) else {
            return Err(AppError::bad_request(anyhow!("Faltan campos obligatorios.")));
        };

        if !Self::curso_exists(db, curso_id).await? {
            return Err(curso_not_found());
        }
        if let Some(clase_id) = dto.clase_id {
            Self::ensure_clase_in_curso(db, clase_id, curso_id).await?;
        }

        let fecha_entrega = parse_fecha_entrega(&fecha_entrega, Utc::now())?;
        let ponderacion = parse_ponderacion(ponderacion, "Ponderación fuera de rango (0–100).")?;
        let lapso: Lapso = parse_enum(&lapso, LAPSO_INVALIDO)?;
        let tipo: ActividadTipo = parse_enum(&tipo, TIPO_INVALIDO)?;
        let estado: ActividadEstado = match non_blank(dto.estado.as_deref()) {
            Some(estado) => parse_enum(&estado, ESTADO_INVALIDO)?,
            None => ActividadEstado::Activa,
        };
        let recursos = into_recursos(dto.recursos.unwrap_or_default());

        let actividad_id: Uuid = sqlx::query_scalar(
            "INSERT INTO actividades (titulo, descripcion, tipo, fecha_entrega, ponderacion,
                                      materia, lapso, curso_id, clase_id, docente_id, recursos,
                                      estado)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING id",
        )
        .bind(&titulo)
        .bind(dto.descripcion.as_deref().map(str::trim).unwrap_or_default())
        .bind(tipo)
        .bind(fecha_entrega)
        .bind(ponderacion)
        .bind(&materia)
        .bind(lapso)
        .bind(curso_id)
        .bind(dto.clase_id)
        .bind(docente_id)
        .bind(Json(&recursos))
        .bind(estado)
        .fetch_one(db)
        .await?;

        track_actividad_created(tipo.as_str());
        tracing::info!(actividad_id = %actividad_id, curso_id = %curso_id, "Actividad creada");

        Self::get_actividad(db, actividad_id).await
    }

    /// The docente's own actividades, earliest due date first.
    #[instrument(skip(db, query))]
    pub async fn get_actividades_docente(
        db: &PgPool,
        docente_id: Uuid,
        query: &ActividadesQuery,
    ) -> Result<Vec<ActividadDetalle>, AppError> {
        let curso_id = parse_id_filter(query.curso_id.as_deref())?;
        let clase_id = parse_id_filter(query.clase_id.as_deref())?;
        let tipo: Option<ActividadTipo> = parse_filter(query.tipo.as_deref(), TIPO_INVALIDO)?;
        let estado: Option<ActividadEstado> =
            parse_filter(query.estado.as_deref(), ESTADO_INVALIDO)?;
        let lapso: Option<Lapso> = parse_filter(query.lapso.as_deref(), LAPSO_INVALIDO)?;

        if let Some(curso_id) = curso_id
            && !Self::curso_exists(db, curso_id).await?
        {
            return Err(curso_not_found());
        }

        let actividades = sqlx::query_as::<_, ActividadDetalle>(&format!(
            "SELECT {}, {}
             WHERE a.docente_id = $1
               AND ($2::uuid IS NULL OR a.curso_id = $2)
               AND ($3::uuid IS NULL OR a.clase_id = $3)
               AND ($4::actividad_tipo IS NULL OR a.tipo = $4)
               AND ($5::actividad_estado IS NULL OR a.estado = $5)
               AND ($6::text IS NULL OR a.materia = $6)
               AND ($7::lapso IS NULL OR a.lapso = $7)
             ORDER BY a.fecha_entrega ASC",
            ACTIVIDAD_COLUMNS, DETALLE_JOINS
        ))
        .bind(docente_id)
        .bind(curso_id)
        .bind(clase_id)
        .bind(tipo)
        .bind(estado)
        .bind(filter_value(query.materia.as_deref()))
        .bind(lapso)
        .fetch_all(db)
        .await?;

        Ok(actividades)
    }

    /// Actividades of the estudiante's clases, plus curso-wide ones of their cursos.
    #[instrument(skip(db, query))]
    pub async fn get_actividades_estudiante(
        db: &PgPool,
        estudiante_id: Uuid,
        query: &ActividadesQuery,
    ) -> Result<Vec<ActividadDetalle>, AppError> {
        let tipo: Option<ActividadTipo> = parse_filter(query.tipo.as_deref(), TIPO_INVALIDO)?;
        let lapso: Option<Lapso> = parse_filter(query.lapso.as_deref(), LAPSO_INVALIDO)?;
        let estado: ActividadEstado = parse_filter(query.estado.as_deref(), ESTADO_INVALIDO)?
            .unwrap_or(ActividadEstado::Activa);

        let actividades = sqlx::query_as::<_, ActividadDetalle>(&format!(
            "SELECT {}, {}
             WHERE (
                   (a.clase_id IS NOT NULL AND a.clase_id IN
                       (SELECT clase_id FROM clase_estudiantes WHERE estudiante_id = $1))
                OR (a.clase_id IS NULL AND a.curso_id IN
                       (SELECT curso_id FROM curso_estudiantes WHERE estudiante_id = $1))
             )
               AND a.estado = $2
               AND ($3::text IS NULL OR a.materia = $3)
               AND ($4::lapso IS NULL OR a.lapso = $4)
               AND ($5::actividad_tipo IS NULL OR a.tipo = $5)
             ORDER BY a.fecha_entrega ASC",
            ACTIVIDAD_COLUMNS, DETALLE_JOINS
        ))
        .bind(estudiante_id)
        .bind(estado)
        .bind(filter_value(query.materia.as_deref()))
        .bind(lapso)
        .bind(tipo)
        .fetch_all(db)
        .await?;

        Ok(actividades)
    }

    /// Any edit resets the notified set so the actividad can be announced again.
    #[instrument(skip(db, dto))]
    pub async fn update_actividad(
        db: &PgPool,
        docente_id: Uuid,
        actividad_id: Uuid,
        dto: UpdateActividadDto,
    ) -> Result<Actividad, AppError> {
        let actual = Self::get_owned(
            db,
            docente_id,
            actividad_id,
            "No tienes permiso para editar esta actividad.",
        )
        .await?;

        let curso_id = actual.curso_id;
        let curso_propio: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM cursos WHERE id = $1 AND docente_id = $2)",
        )
        .bind(curso_id)
        .bind(docente_id)
        .fetch_one(db)
        .await?;
        if !curso_propio {
            return Err(AppError::forbidden(
                "Curso asociado no válido o sin permiso.".to_string(),
            ));
        }

        let con_estudiantes: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM curso_estudiantes WHERE curso_id = $1)",
        )
        .bind(curso_id)
        .fetch_one(db)
        .await?;
        if !con_estudiantes {
            return Err(AppError::bad_request(anyhow!(
                "El curso no tiene estudiantes asignados."
            )));
        }

        let fecha_entrega = non_blank(dto.fecha_entrega.as_deref())
            .map(|f| parse_fecha_entrega(&f, Utc::now()))
            .transpose()?;
        let ponderacion = dto
            .ponderacion
            .as_ref()
            .filter(|p| p.is_present())
            .map(|p| parse_ponderacion(p, "La ponderación debe estar entre 0 y 100."))
            .transpose()?;
        let lapso: Option<Lapso> = non_blank(dto.lapso.as_deref())
            .map(|l| parse_enum(&l, LAPSO_INVALIDO))
            .transpose()?;
        let tipo: Option<ActividadTipo> = non_blank(dto.tipo.as_deref())
            .map(|t| parse_enum(&t, TIPO_INVALIDO))
            .transpose()?;
        let estado: Option<ActividadEstado> = non_blank(dto.estado.as_deref())
            .map(|e| parse_enum(&e, ESTADO_INVALIDO))
            .transpose()?;
        let recursos = dto.recursos.map(into_recursos);

        let mut tx = db.begin().await?;

        sqlx::query(
            "UPDATE actividades SET
                titulo = COALESCE($2, titulo),
                descripcion = COALESCE($3, descripcion),
                tipo = COALESCE($4, tipo),
                fecha_entrega = COALESCE($5, fecha_entrega),
                ponderacion = COALESCE($6, ponderacion),
                materia = COALESCE($7, materia),
                lapso = COALESCE($8, lapso),
                recursos = COALESCE($9, recursos),
                estado = COALESCE($10, estado),
                notificada = FALSE,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(actividad_id)
        .bind(non_blank(dto.titulo.as_deref()))
        .bind(dto.descripcion.as_deref().map(str::trim))
        .bind(tipo)
        .bind(fecha_entrega)
        .bind(ponderacion)
        .bind(non_blank(dto.materia.as_deref()))
        .bind(lapso)
        .bind(recursos.as_ref().map(Json))
        .bind(estado)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM actividad_notificados WHERE actividad_id = $1")
            .bind(actividad_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Self::get_actividad(db, actividad_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_actividad(
        db: &PgPool,
        docente_id: Uuid,
        actividad_id: Uuid,
    ) -> Result<Actividad, AppError> {
        let actividad = Self::get_owned(
            db,
            docente_id,
            actividad_id,
            "No tienes permiso para eliminar esta actividad.",
        )
        .await?;

        sqlx::query("DELETE FROM actividades WHERE id = $1")
            .bind(actividad_id)
            .execute(db)
            .await?;

        tracing::info!(actividad_id = %actividad_id, "Actividad eliminada");

        Ok(actividad)
    }

    async fn estudiantes_destino(db: &PgPool, actividad: &Actividad) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<Uuid> = match actividad.clase_id {
            Some(clase_id) => sqlx::query_scalar(
                "SELECT estudiante_id FROM clase_estudiantes WHERE clase_id = $1 ORDER BY created_at",
            )
            .bind(clase_id)
            .fetch_all(db)
            .await?,
            None => sqlx::query_scalar(
                "SELECT estudiante_id FROM curso_estudiantes WHERE curso_id = $1 ORDER BY created_at",
            )
            .bind(actividad.curso_id)
            .fetch_all(db)
            .await?,
        };
        Ok(ids)
    }

    async fn insert_notificaciones(
        tx: &mut Transaction<'_, Postgres>,
        estudiantes: &[Uuid],
        actividad: &Actividad,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notificaciones (usuario_id, titulo, mensaje, tipo)
             SELECT unnest($1::uuid[]), $2, $3, $4",
        )
        .bind(estudiantes)
        .bind("Nueva actividad")
        .bind(format!("Se ha publicado la actividad: {}", actividad.titulo))
        .bind(NotificacionTipo::Actividad)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO actividad_notificados (actividad_id, estudiante_id)
             SELECT $1, unnest($2::uuid[])
             ON CONFLICT DO NOTHING",
        )
        .bind(actividad.id)
        .bind(estudiantes)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Notifies the clase's estudiantes (the curso's when the actividad has no
    /// clase) that have not been notified yet. `None` when nobody is enrolled.
    #[instrument(skip(db))]
    pub async fn notificar_actividad(
        db: &PgPool,
        docente_id: Uuid,
        actividad_id: Uuid,
    ) -> Result<Option<Vec<Uuid>>, AppError> {
        let actividad = Self::get_owned(
            db,
            docente_id,
            actividad_id,
            "No tienes permiso para notificar esta actividad.",
        )
        .await?;

        let destino = Self::estudiantes_destino(db, &actividad).await?;
        if destino.is_empty() {
            return Ok(None);
        }

        let pendientes: Vec<Uuid> = destino
            .into_iter()
            .filter(|id| !actividad.notificada_a.contains(id))
            .collect();

        let mut tx = db.begin().await?;

        if !pendientes.is_empty() {
            Self::insert_notificaciones(&mut tx, &pendientes, &actividad).await?;
        }

        sqlx::query("UPDATE actividades SET notificada = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(actividad_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        track_notificaciones_enviadas("actividad", pendientes.len());
        tracing::info!(
            actividad_id = %actividad_id,
            notificados = pendientes.len(),
            "Actividad notificada"
        );

        Ok(Some(pendientes))
    }
}
