use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::cursos::CursoRef;
use colegio_models::{EstudianteRef, UserRole, UserSummary};

use crate::middleware::auth::AuthUser;
use crate::utils::academic::{non_blank, parse_unique_ids};
use crate::utils::auth_helpers::filter_validated_estudiantes;

use super::model::{
    AsignarEstudiantesClaseDto, Clase, ClaseDetalle, ClaseListItem, ClaseRow, CreateClaseDto,
    Horario, UpdateClaseDto,
};

const CLASE_COLUMNS: &str = "c.id, c.nombre, c.docente_id, c.curso_id, c.horario_dia, \
                             c.horario_hora_inicio, c.horario_hora_fin, c.materia, c.descripcion, \
                             c.activo, c.created_at, c.updated_at";

#[derive(FromRow)]
struct EstudianteRow {
    clase_id: Uuid,
    #[sqlx(flatten)]
    estudiante: EstudianteRef,
}

fn clase_not_found() -> AppError {
    AppError::not_found(anyhow!("Clase no encontrada"))
}

pub struct ClaseService;

impl ClaseService {
    async fn populate(db: &PgPool, rows: Vec<ClaseRow>) -> Result<Vec<ClaseDetalle>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let clase_ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let docente_ids: Vec<Uuid> = rows.iter().map(|c| c.docente_id).collect();
        let curso_ids: Vec<Uuid> = rows.iter().map(|c| c.curso_id).collect();

        let docentes: HashMap<Uuid, UserSummary> = sqlx::query_as::<_, UserSummary>(
            "SELECT id, nombre, email, role FROM users WHERE id = ANY($1)",
        )
        .bind(&docente_ids)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

        let cursos: HashMap<Uuid, CursoRef> = sqlx::query_as::<_, CursoRef>(
            "SELECT id, nombre, anio_academico, anio_estudiantil, seccion
             FROM cursos WHERE id = ANY($1)",
        )
        .bind(&curso_ids)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

        let mut estudiantes: HashMap<Uuid, Vec<EstudianteRef>> = HashMap::new();
        for row in sqlx::query_as::<_, EstudianteRow>(
            "SELECT ce.clase_id, u.id, u.nombre, u.email
             FROM clase_estudiantes ce
             JOIN users u ON u.id = ce.estudiante_id
             WHERE ce.clase_id = ANY($1)
             ORDER BY u.nombre, u.email",
        )
        .bind(&clase_ids)
        .fetch_all(db)
        .await?
        {
            estudiantes
                .entry(row.clase_id)
                .or_default()
                .push(row.estudiante);
        }

        Ok(rows
            .into_iter()
            .map(|row| ClaseDetalle {
                docente: docentes.get(&row.docente_id).cloned(),
                curso: cursos.get(&row.curso_id).cloned(),
                estudiantes: estudiantes.remove(&row.id).unwrap_or_default(),
                clase: Clase::from(row),
            })
            .collect())
    }

    fn to_list_items(detalles: Vec<ClaseDetalle>) -> Vec<ClaseListItem> {
        detalles
            .into_iter()
            .map(|d| ClaseListItem {
                cantidad_estudiantes: d.estudiantes.len(),
                clase: d.clase,
                docente: d.docente,
                curso: d.curso,
            })
            .collect()
    }

    async fn find_row(db: &PgPool, clase_id: Uuid) -> Result<Option<ClaseRow>, AppError> {
        let row = sqlx::query_as::<_, ClaseRow>(&format!(
            "SELECT {} FROM clases c WHERE c.id = $1",
            CLASE_COLUMNS
        ))
        .bind(clase_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    async fn ensure_docente(db: &PgPool, docente_id: Uuid) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = 'docente')",
        )
        .bind(docente_id)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Docente no encontrado")));
        }
        Ok(())
    }

    async fn ensure_curso(db: &PgPool, curso_id: Uuid) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cursos WHERE id = $1)")
            .bind(curso_id)
            .fetch_one(db)
            .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Curso no encontrado")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_clase(db: &PgPool, clase_id: Uuid) -> Result<ClaseDetalle, AppError> {
        let row = Self::find_row(db, clase_id)
            .await?
            .ok_or_else(clase_not_found)?;

        Self::populate(db, vec![row])
            .await?
            .pop()
            .ok_or_else(clase_not_found)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_clase(db: &PgPool, dto: CreateClaseDto) -> Result<ClaseDetalle, AppError> {
        let (Some(nombre), Some(docente_id), Some(curso_id), Some(materia)) = (
            non_blank(dto.nombre.as_deref()),
            dto.docente_id,
            dto.curso_id,
            non_blank(dto.materia.as_deref()),
        ) else {
            return Err(AppError::bad_request(anyhow!(
                "Nombre, docente, curso, horario y materia son obligatorios"
            )));
        };

        Self::ensure_docente(db, docente_id).await?;
        Self::ensure_curso(db, curso_id).await?;

        let horario = dto
            .horario
            .map(|h| h.merge_into(Horario::default()))
            .unwrap_or_default();

        let clase_id: Uuid = sqlx::query_scalar(
            "INSERT INTO clases (nombre, docente_id, curso_id, horario_dia, horario_hora_inicio,
                                 horario_hora_fin, materia, descripcion)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&nombre)
        .bind(docente_id)
        .bind(curso_id)
        .bind(&horario.dia)
        .bind(&horario.hora_inicio)
        .bind(&horario.hora_fin)
        .bind(&materia)
        .bind(dto.descripcion.as_deref().map(str::trim).unwrap_or_default())
        .fetch_one(db)
        .await?;

        tracing::info!(clase_id = %clase_id, curso_id = %curso_id, "Clase creada");

        Self::get_clase(db, clase_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_clases(db: &PgPool) -> Result<Vec<ClaseListItem>, AppError> {
        Ok(Self::to_list_items(Self::get_clases_enriquecidas(db).await?))
    }

    #[instrument(skip(db))]
    pub async fn get_clases_enriquecidas(db: &PgPool) -> Result<Vec<ClaseDetalle>, AppError> {
        let rows = sqlx::query_as::<_, ClaseRow>(&format!(
            "SELECT {} FROM clases c ORDER BY c.created_at DESC",
            CLASE_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        Self::populate(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn get_clases_docente(
        db: &PgPool,
        docente_id: Uuid,
    ) -> Result<Vec<ClaseListItem>, AppError> {
        let rows = sqlx::query_as::<_, ClaseRow>(&format!(
            "SELECT {} FROM clases c WHERE c.docente_id = $1 ORDER BY c.created_at DESC",
            CLASE_COLUMNS
        ))
        .bind(docente_id)
        .fetch_all(db)
        .await?;

        Ok(Self::to_list_items(Self::populate(db, rows).await?))
    }

    #[instrument(skip(db))]
    pub async fn get_clases_estudiante(
        db: &PgPool,
        estudiante_id: Uuid,
    ) -> Result<Vec<ClaseListItem>, AppError> {
        let rows = sqlx::query_as::<_, ClaseRow>(&format!(
            "SELECT {} FROM clases c
             JOIN clase_estudiantes ce ON ce.clase_id = c.id
             WHERE ce.estudiante_id = $1
             ORDER BY c.nombre",
            CLASE_COLUMNS
        ))
        .bind(estudiante_id)
        .fetch_all(db)
        .await?;

        Ok(Self::to_list_items(Self::populate(db, rows).await?))
    }

    /// Validated and active estudiantes a docente can enrol.
    #[instrument(skip(db))]
    pub async fn get_estudiantes_disponibles(db: &PgPool) -> Result<Vec<EstudianteRef>, AppError> {
        let estudiantes = sqlx::query_as::<_, EstudianteRef>(
            "SELECT id, nombre, email FROM users
             WHERE role = 'estudiante' AND is_validated = TRUE AND activo = TRUE
             ORDER BY nombre, email",
        )
        .fetch_all(db)
        .await?;

        Ok(estudiantes)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_clase(
        db: &PgPool,
        clase_id: Uuid,
        dto: UpdateClaseDto,
    ) -> Result<ClaseDetalle, AppError> {
        let current = Self::find_row(db, clase_id)
            .await?
            .ok_or_else(clase_not_found)?;

        if let Some(docente_id) = dto.docente_id {
            Self::ensure_docente(db, docente_id).await?;
        }
        if let Some(curso_id) = dto.curso_id {
            Self::ensure_curso(db, curso_id).await?;
        }

        let horario = dto
            .horario
            .map(|h| h.merge_into(Clase::from(current).horario));

        sqlx::query(
            "UPDATE clases SET
                nombre = COALESCE($2, nombre),
                docente_id = COALESCE($3, docente_id),
                curso_id = COALESCE($4, curso_id),
                horario_dia = COALESCE($5, horario_dia),
                horario_hora_inicio = COALESCE($6, horario_hora_inicio),
                horario_hora_fin = COALESCE($7, horario_hora_fin),
                materia = COALESCE($8, materia),
                descripcion = COALESCE($9, descripcion),
                activo = COALESCE($10, activo),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(clase_id)
        .bind(non_blank(dto.nombre.as_deref()))
        .bind(dto.docente_id)
        .bind(dto.curso_id)
        .bind(horario.as_ref().map(|h| h.dia.as_str()))
        .bind(horario.as_ref().map(|h| h.hora_inicio.as_str()))
        .bind(horario.as_ref().map(|h| h.hora_fin.as_str()))
        .bind(non_blank(dto.materia.as_deref()))
        .bind(dto.descripcion.as_deref().map(str::trim))
        .bind(dto.activo)
        .execute(db)
        .await?;

        Self::get_clase(db, clase_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_clase(db: &PgPool, clase_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM clases WHERE id = $1")
            .bind(clase_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(clase_not_found());
        }

        Ok(())
    }

    /// Enrols validated estudiantes; docentes may only modify their own clases.
    #[instrument(skip(db, auth_user, dto))]
    pub async fn asignar_estudiantes(
        db: &PgPool,
        auth_user: &AuthUser,
        dto: AsignarEstudiantesClaseDto,
    ) -> Result<(usize, ClaseDetalle), AppError> {
        let (Some(clase_id), Some(ids)) = (
            dto.clase_id,
            dto.estudiantes_ids.filter(|ids| !ids.is_empty()),
        ) else {
            return Err(AppError::bad_request(anyhow!(
                "Clase ID y lista de estudiantes son obligatorios"
            )));
        };

        let row = Self::find_row(db, clase_id)
            .await?
            .ok_or_else(clase_not_found)?;

        if auth_user.role() == Some(UserRole::Docente) && row.docente_id != auth_user.user_id()? {
            return Err(AppError::forbidden(
                "No tienes permiso para modificar esta clase".to_string(),
            ));
        }

        let validos = filter_validated_estudiantes(db, &parse_unique_ids(&ids)).await?;

        let asignados = if validos.is_empty() {
            0
        } else {
            sqlx::query(
                "INSERT INTO clase_estudiantes (clase_id, estudiante_id)
                 SELECT $1, unnest($2::uuid[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(clase_id)
            .bind(&validos)
            .execute(db)
            .await?
            .rows_affected() as usize
        };

        let clase = Self::get_clase(db, clase_id).await?;

        Ok((asignados, clase))
    }
}
