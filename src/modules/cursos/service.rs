use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_core::serde::NumberOrText;
use colegio_models::{EstudianteRef, UserRole, UserSummary};

use crate::metrics::track_curso_created;
use crate::middleware::auth::AuthUser;
use crate::utils::academic::{
    is_valid_anio_academico, is_valid_anio_estudiantil, non_blank, parse_unique_ids,
};
use crate::utils::auth_helpers::filter_validated_estudiantes;

use super::model::{
    AsignarEstudiantesCursoDto, CreateCursoDto, Curso, CursoResumen, CursoRow, Materia,
    MateriaInput, UpdateCursoDto,
};

const CURSO_COLUMNS: &str = "id, nombre, anio_academico, anio_estudiantil, seccion, docente_id, \
                             descripcion, activo, created_at, updated_at";

const ANIO_ACADEMICO_INVALIDO: &str = "Año académico inválido (2000–2100).";
const ANIO_ESTUDIANTIL_INVALIDO: &str = "Año estudiantil inválido (1–6).";

#[derive(FromRow)]
struct MateriaRow {
    curso_id: Uuid,
    #[sqlx(flatten)]
    materia: Materia,
}

#[derive(FromRow)]
struct EstudianteRow {
    curso_id: Uuid,
    #[sqlx(flatten)]
    estudiante: EstudianteRef,
}

/// Outcome of a bulk enrolment.
#[derive(Debug)]
pub struct AsignacionCurso {
    pub asignados: usize,
    pub curso: Curso,
}

fn parse_anio(value: &NumberOrText, is_valid: fn(i32) -> bool, msg: &str) -> Result<i32, AppError> {
    value
        .as_i32()
        .filter(|anio| is_valid(*anio))
        .ok_or_else(|| AppError::bad_request(anyhow!("{}", msg)))
}

fn map_duplicate(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::conflict(anyhow!("Ya existe un curso con esos datos."));
    }
    AppError::from(e)
}

fn curso_not_found() -> AppError {
    AppError::not_found(anyhow!("Curso no encontrado."))
}

fn materias_from_input(input: Vec<MateriaInput>) -> Vec<Materia> {
    input
        .into_iter()
        .filter_map(MateriaInput::into_materia)
        .collect()
}

pub struct CursoService;

impl CursoService {
    /// Loads docente, materias and estudiantes for each row in three queries.
    pub async fn populate(db: &PgPool, rows: Vec<CursoRow>) -> Result<Vec<Curso>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let curso_ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let docente_ids: Vec<Uuid> = rows.iter().filter_map(|c| c.docente_id).collect();

        let docentes: HashMap<Uuid, UserSummary> = sqlx::query_as::<_, UserSummary>(
            "SELECT id, nombre, email, role FROM users WHERE id = ANY($1)",
        )
        .bind(&docente_ids)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

        let mut materias: HashMap<Uuid, Vec<Materia>> = HashMap::new();
        for row in sqlx::query_as::<_, MateriaRow>(
            "SELECT curso_id, nombre, docente_asignado FROM curso_materias
             WHERE curso_id = ANY($1)
             ORDER BY posicion",
        )
        .bind(&curso_ids)
        .fetch_all(db)
        .await?
        {
            materias.entry(row.curso_id).or_default().push(row.materia);
        }

        let mut estudiantes: HashMap<Uuid, Vec<EstudianteRef>> = HashMap::new();
        for row in sqlx::query_as::<_, EstudianteRow>(
            "SELECT ce.curso_id, u.id, u.nombre, u.email
             FROM curso_estudiantes ce
             JOIN users u ON u.id = ce.estudiante_id
             WHERE ce.curso_id = ANY($1)
             ORDER BY u.nombre, u.email",
        )
        .bind(&curso_ids)
        .fetch_all(db)
        .await?
        {
            estudiantes
                .entry(row.curso_id)
                .or_default()
                .push(row.estudiante);
        }

        Ok(rows
            .into_iter()
            .map(|datos| Curso {
                docente: datos.docente_id.and_then(|id| docentes.get(&id).cloned()),
                materias: materias.remove(&datos.id).unwrap_or_default(),
                estudiantes: estudiantes.remove(&datos.id).unwrap_or_default(),
                datos,
            })
            .collect())
    }

    async fn find_row(db: &PgPool, curso_id: Uuid) -> Result<Option<CursoRow>, AppError> {
        let row = sqlx::query_as::<_, CursoRow>(&format!(
            "SELECT {} FROM cursos WHERE id = $1",
            CURSO_COLUMNS
        ))
        .bind(curso_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    #[instrument(skip(db))]
    pub async fn get_curso(db: &PgPool, curso_id: Uuid) -> Result<Curso, AppError> {
        let row = Self::find_row(db, curso_id)
            .await?
            .ok_or_else(curso_not_found)?;

        Self::populate(db, vec![row])
            .await?
            .pop()
            .ok_or_else(curso_not_found)
    }

    async fn replace_materias(
        tx: &mut Transaction<'_, Postgres>,
        curso_id: Uuid,
        materias: &[Materia],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM curso_materias WHERE curso_id = $1")
            .bind(curso_id)
            .execute(&mut **tx)
            .await?;

        if materias.is_empty() {
            return Ok(());
        }

        let nombres: Vec<&str> = materias.iter().map(|m| m.nombre.as_str()).collect();
        let docentes: Vec<Option<Uuid>> = materias.iter().map(|m| m.docente_asignado).collect();

        sqlx::query(
            "INSERT INTO curso_materias (curso_id, nombre, docente_asignado, posicion)
             SELECT $1, m.nombre, d.id, m.posicion::int
             FROM unnest($2::text[], $3::uuid[]) WITH ORDINALITY AS m(nombre, docente, posicion)
             LEFT JOIN users d ON d.id = m.docente",
        )
        .bind(curso_id)
        .bind(&nombres)
        .bind(&docentes)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Creates a curso on behalf of an admin or a validated docente.
    #[instrument(skip(db, dto))]
    pub async fn create_curso(
        db: &PgPool,
        caller_id: Uuid,
        dto: CreateCursoDto,
    ) -> Result<Curso, AppError> {
        let required = (
            non_blank(dto.nombre.as_deref()),
            dto.anio_academico.filter(NumberOrText::is_present),
            dto.anio_estudiantil.filter(NumberOrText::is_present),
            non_blank(dto.seccion.as_deref()),
        );
        let (Some(nombre), Some(anio_academico), Some(anio_estudiantil), Some(seccion)) = required
        else {
            return Err(AppError::bad_request(anyhow!(
                "Nombre, año académico, año estudiantil, sección y usuario son obligatorios."
            )));
        };

        let anio_academico =
            parse_anio(&anio_academico, is_valid_anio_academico, ANIO_ACADEMICO_INVALIDO)?;
        let anio_estudiantil = parse_anio(
            &anio_estudiantil,
            is_valid_anio_estudiantil,
            ANIO_ESTUDIANTIL_INVALIDO,
        )?;

        let (role, is_validated): (UserRole, bool) =
            sqlx::query_as("SELECT role, is_validated FROM users WHERE id = $1")
                .bind(caller_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::forbidden("Usuario no encontrado.".to_string()))?;

        let docente_id = match role {
            UserRole::Docente if !is_validated => {
                return Err(AppError::forbidden("Docente no validado.".to_string()));
            }
            UserRole::Docente => Some(caller_id),
            UserRole::Admin => match dto.docente_id {
                Some(docente_id) => {
                    let exists: bool = sqlx::query_scalar(
                        "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = 'docente')",
                    )
                    .bind(docente_id)
                    .fetch_one(db)
                    .await?;
                    if !exists {
                        return Err(AppError::not_found(anyhow!("Docente no encontrado.")));
                    }
                    Some(docente_id)
                }
                None => None,
            },
            UserRole::Estudiante => {
                return Err(AppError::forbidden(
                    "Rol no autorizado para crear cursos.".to_string(),
                ));
            }
        };

        let materias = materias_from_input(dto.materias.unwrap_or_default());
        let estudiantes = parse_unique_ids(&dto.estudiantes.unwrap_or_default());

        let mut tx = db.begin().await?;

        let row = sqlx::query_as::<_, CursoRow>(&format!(
            "INSERT INTO cursos (nombre, anio_academico, anio_estudiantil, seccion, docente_id, descripcion)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            CURSO_COLUMNS
        ))
        .bind(&nombre)
        .bind(anio_academico)
        .bind(anio_estudiantil)
        .bind(&seccion)
        .bind(docente_id)
        .bind(dto.descripcion.as_deref().map(str::trim).unwrap_or_default())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_duplicate)?;

        Self::replace_materias(&mut tx, row.id, &materias).await?;

        if !estudiantes.is_empty() {
            sqlx::query(
                "INSERT INTO curso_estudiantes (curso_id, estudiante_id)
                 SELECT $1, u.id FROM users u
                 WHERE u.id = ANY($2) AND u.role = 'estudiante'
                 ON CONFLICT DO NOTHING",
            )
            .bind(row.id)
            .bind(&estudiantes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        track_curso_created();
        tracing::info!(curso_id = %row.id, "Curso creado");

        Self::get_curso(db, row.id).await
    }

    /// Adds validated estudiantes to a curso, skipping those already enrolled.
    #[instrument(skip(db, auth_user, dto))]
    pub async fn asignar_estudiantes(
        db: &PgPool,
        auth_user: &AuthUser,
        dto: AsignarEstudiantesCursoDto,
    ) -> Result<AsignacionCurso, AppError> {
        let curso_id = dto
            .curso_id
            .ok_or_else(|| AppError::bad_request(anyhow!("ID de curso inválido.")))?;

        let ids = dto
            .estudiantes_ids
            .filter(|ids| !ids.is_empty())
            .ok_or_else(|| AppError::bad_request(anyhow!("Lista de estudiantes inválida.")))?;

        let row = Self::find_row(db, curso_id)
            .await?
            .ok_or_else(curso_not_found)?;

        if auth_user.role() == Some(UserRole::Docente)
            && row.docente_id != Some(auth_user.user_id()?)
        {
            return Err(AppError::forbidden(
                "No tienes permiso para modificar este curso.".to_string(),
            ));
        }

        let validos = filter_validated_estudiantes(db, &parse_unique_ids(&ids)).await?;

        let asignados = if validos.is_empty() {
            0
        } else {
            sqlx::query(
                "INSERT INTO curso_estudiantes (curso_id, estudiante_id)
                 SELECT $1, unnest($2::uuid[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(curso_id)
            .bind(&validos)
            .execute(db)
            .await?
            .rows_affected() as usize
        };

        let curso = Self::get_curso(db, curso_id).await?;

        Ok(AsignacionCurso { asignados, curso })
    }

    #[instrument(skip(db))]
    pub async fn get_cursos_activos(db: &PgPool) -> Result<Vec<CursoResumen>, AppError> {
        let rows = sqlx::query_as::<_, CursoRow>(&format!(
            "SELECT {} FROM cursos WHERE activo = TRUE ORDER BY created_at DESC",
            CURSO_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        Self::resumenes(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn get_cursos_docente(
        db: &PgPool,
        docente_id: Uuid,
    ) -> Result<Vec<CursoResumen>, AppError> {
        let rows = sqlx::query_as::<_, CursoRow>(&format!(
            "SELECT {} FROM cursos WHERE docente_id = $1 ORDER BY created_at DESC",
            CURSO_COLUMNS
        ))
        .bind(docente_id)
        .fetch_all(db)
        .await?;

        Self::resumenes(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn get_cursos_estudiante(
        db: &PgPool,
        estudiante_id: Uuid,
    ) -> Result<Vec<CursoResumen>, AppError> {
        let rows = sqlx::query_as::<_, CursoRow>(
            "SELECT c.id, c.nombre, c.anio_academico, c.anio_estudiantil, c.seccion, c.docente_id,
                    c.descripcion, c.activo, c.created_at, c.updated_at
             FROM cursos c
             JOIN curso_estudiantes ce ON ce.curso_id = c.id
             WHERE ce.estudiante_id = $1
             ORDER BY c.anio_academico DESC, c.nombre",
        )
        .bind(estudiante_id)
        .fetch_all(db)
        .await?;

        Self::resumenes(db, rows).await
    }

    async fn resumenes(db: &PgPool, rows: Vec<CursoRow>) -> Result<Vec<CursoResumen>, AppError> {
        let cursos = Self::populate(db, rows).await?;
        Ok(cursos.iter().map(CursoResumen::from).collect())
    }

    /// Admins may edit any curso, docentes only their own.
    fn ensure_can_modify(
        auth_user: &AuthUser,
        row: &CursoRow,
        forbidden_msg: &str,
    ) -> Result<(), AppError> {
        let caller_id = auth_user.user_id()?;
        match auth_user.role() {
            Some(UserRole::Admin) => Ok(()),
            Some(UserRole::Docente) if row.docente_id == Some(caller_id) => Ok(()),
            _ => Err(AppError::forbidden(forbidden_msg.to_string())),
        }
    }

    #[instrument(skip(db, auth_user, dto))]
    pub async fn update_curso(
        db: &PgPool,
        auth_user: &AuthUser,
        curso_id: Uuid,
        dto: UpdateCursoDto,
    ) -> Result<Curso, AppError> {
        let row = Self::find_row(db, curso_id)
            .await?
            .ok_or_else(curso_not_found)?;

        Self::ensure_can_modify(auth_user, &row, "No puedes editar este curso.")?;

        let anio_academico = dto
            .anio_academico
            .filter(NumberOrText::is_present)
            .map(|v| parse_anio(&v, is_valid_anio_academico, ANIO_ACADEMICO_INVALIDO))
            .transpose()?;
        let anio_estudiantil = dto
            .anio_estudiantil
            .filter(NumberOrText::is_present)
            .map(|v| parse_anio(&v, is_valid_anio_estudiantil, ANIO_ESTUDIANTIL_INVALIDO))
            .transpose()?;

        let mut tx = db.begin().await?;

        sqlx::query(
            "UPDATE cursos SET
                nombre = COALESCE($2, nombre),
                anio_academico = COALESCE($3, anio_academico),
                anio_estudiantil = COALESCE($4, anio_estudiantil),
                seccion = COALESCE($5, seccion),
                descripcion = COALESCE($6, descripcion),
                activo = COALESCE($7, activo),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(curso_id)
        .bind(non_blank(dto.nombre.as_deref()))
        .bind(anio_academico)
        .bind(anio_estudiantil)
        .bind(non_blank(dto.seccion.as_deref()))
        .bind(dto.descripcion.as_deref().map(str::trim))
        .bind(dto.activo)
        .execute(&mut *tx)
        .await
        .map_err(map_duplicate)?;

        if let Some(materias) = dto.materias {
            let materias = materias_from_input(materias.unwrap_or_default());
            Self::replace_materias(&mut tx, curso_id, &materias).await?;
        }

        tx.commit().await?;

        Self::get_curso(db, curso_id).await
    }

    /// Cascades to clases, actividades and entregas.
    #[instrument(skip(db, auth_user))]
    pub async fn delete_curso(
        db: &PgPool,
        auth_user: &AuthUser,
        curso_id: Uuid,
    ) -> Result<Curso, AppError> {
        let curso = Self::get_curso(db, curso_id).await?;

        Self::ensure_can_modify(auth_user, &curso.datos, "No puedes eliminar este curso.")?;

        let result = sqlx::query("DELETE FROM cursos WHERE id = $1")
            .bind(curso_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(curso_not_found());
        }

        tracing::info!(curso_id = %curso_id, "Curso eliminado");

        Ok(curso)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::utils::test_fixtures::{
        auth_user, enroll_in_curso, insert_actividad, insert_clase, insert_user, next_week,
    };

    fn create_dto() -> CreateCursoDto {
        CreateCursoDto {
            nombre: Some("Matemáticas 3A".to_string()),
            anio_academico: Some(NumberOrText::Text("2025".to_string())),
            anio_estudiantil: Some(NumberOrText::Number(3.0)),
            seccion: Some("A".to_string()),
            descripcion: Some("Tercer año".to_string()),
            materias: Some(vec![
                MateriaInput::Nombre("Álgebra".to_string()),
                MateriaInput::Nombre("  ".to_string()),
                MateriaInput::Detalle {
                    nombre: "Geometría".to_string(),
                    docente_asignado: None,
                },
            ]),
            ..Default::default()
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_curso_by_docente(pool: PgPool) {
        let docente = insert_user(&pool, UserRole::Docente, true).await;
        let estudiante = insert_user(&pool, UserRole::Estudiante, true).await;

        let dto = CreateCursoDto {
            estudiantes: Some(vec![
                estudiante.to_string(),
                "no-es-uuid".to_string(),
                estudiante.to_string(),
            ]),
            ..create_dto()
        };

        let curso = CursoService::create_curso(&pool, docente, dto).await.unwrap();

        assert_eq!(curso.datos.anio_academico, 2025);
        assert_eq!(curso.datos.anio_estudiantil, 3);
        assert_eq!(curso.datos.docente_id, Some(docente));
        assert_eq!(curso.docente.as_ref().map(|d| d.id), Some(docente));
        let materias: Vec<&str> = curso.materias.iter().map(|m| m.nombre.as_str()).collect();
        assert_eq!(materias, vec!["Álgebra", "Geometría"]);
        assert_eq!(curso.estudiantes.len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_curso_missing_fields(pool: PgPool) {
        let admin = insert_user(&pool, UserRole::Admin, true).await;
        let dto = CreateCursoDto {
            anio_academico: Some(NumberOrText::Text("".to_string())),
            ..create_dto()
        };

        let err = CursoService::create_curso(&pool, admin, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "Nombre, año académico, año estudiantil, sección y usuario son obligatorios."
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_curso_year_ranges(pool: PgPool) {
        let admin = insert_user(&pool, UserRole::Admin, true).await;

        let dto = CreateCursoDto {
            anio_academico: Some(NumberOrText::Number(1999.0)),
            ..create_dto()
        };
        let err = CursoService::create_curso(&pool, admin, dto).await.unwrap_err();
        assert_eq!(err.message(), ANIO_ACADEMICO_INVALIDO);

        let dto = CreateCursoDto {
            anio_estudiantil: Some(NumberOrText::Text("siete".to_string())),
            ..create_dto()
        };
        let err = CursoService::create_curso(&pool, admin, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), ANIO_ESTUDIANTIL_INVALIDO);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_curso_caller_checks(pool: PgPool) {
        let pending_docente = insert_user(&pool, UserRole::Docente, false).await;
        let estudiante = insert_user(&pool, UserRole::Estudiante, true).await;

        let err = CursoService::create_curso(&pool, Uuid::new_v4(), create_dto())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Usuario no encontrado.");

        let err = CursoService::create_curso(&pool, pending_docente, create_dto())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Docente no validado.");

        let err = CursoService::create_curso(&pool, estudiante, create_dto())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Rol no autorizado para crear cursos.");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_curso_duplicate(pool: PgPool) {
        let admin = insert_user(&pool, UserRole::Admin, true).await;
        CursoService::create_curso(&pool, admin, create_dto())
            .await
            .unwrap();

        let err = CursoService::create_curso(&pool, admin, create_dto())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message(), "Ya existe un curso con esos datos.");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_admin_assigns_docente(pool: PgPool) {
        let admin = insert_user(&pool, UserRole::Admin, true).await;
        let docente = insert_user(&pool, UserRole::Docente, true).await;

        let dto = CreateCursoDto {
            docente_id: Some(docente),
            ..create_dto()
        };
        let curso = CursoService::create_curso(&pool, admin, dto).await.unwrap();
        assert_eq!(curso.datos.docente_id, Some(docente));

        let dto = CreateCursoDto {
            nombre: Some("Otro".to_string()),
            docente_id: Some(admin),
            ..create_dto()
        };
        let err = CursoService::create_curso(&pool, admin, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_asignar_estudiantes(pool: PgPool) {
        let docente = insert_user(&pool, UserRole::Docente, true).await;
        let validado = insert_user(&pool, UserRole::Estudiante, true).await;
        let pendiente = insert_user(&pool, UserRole::Estudiante, false).await;
        let curso = CursoService::create_curso(&pool, docente, create_dto())
            .await
            .unwrap();

        let dto = || AsignarEstudiantesCursoDto {
            curso_id: Some(curso.datos.id),
            estudiantes_ids: Some(vec![validado.to_string(), pendiente.to_string()]),
        };

        let caller = auth_user(docente, UserRole::Docente);
        let result = CursoService::asignar_estudiantes(&pool, &caller, dto())
            .await
            .unwrap();
        assert_eq!(result.asignados, 1);
        assert_eq!(result.curso.estudiantes[0].id, validado);

        let again = CursoService::asignar_estudiantes(&pool, &caller, dto())
            .await
            .unwrap();
        assert_eq!(again.asignados, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_asignar_estudiantes_errors(pool: PgPool) {
        let owner = insert_user(&pool, UserRole::Docente, true).await;
        let other = insert_user(&pool, UserRole::Docente, true).await;
        let curso = CursoService::create_curso(&pool, owner, create_dto())
            .await
            .unwrap();
        let caller = auth_user(other, UserRole::Docente);

        let err = CursoService::asignar_estudiantes(
            &pool,
            &caller,
            AsignarEstudiantesCursoDto {
                curso_id: None,
                estudiantes_ids: Some(vec![]),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), "ID de curso inválido.");

        let err = CursoService::asignar_estudiantes(
            &pool,
            &caller,
            AsignarEstudiantesCursoDto {
                curso_id: Some(curso.datos.id),
                estudiantes_ids: Some(vec![]),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), "Lista de estudiantes inválida.");

        let err = CursoService::asignar_estudiantes(
            &pool,
            &caller,
            AsignarEstudiantesCursoDto {
                curso_id: Some(Uuid::new_v4()),
                estudiantes_ids: Some(vec![Uuid::new_v4().to_string()]),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = CursoService::asignar_estudiantes(
            &pool,
            &caller,
            AsignarEstudiantesCursoDto {
                curso_id: Some(curso.datos.id),
                estudiantes_ids: Some(vec![Uuid::new_v4().to_string()]),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "No tienes permiso para modificar este curso.");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_listings(pool: PgPool) {
        let docente = insert_user(&pool, UserRole::Docente, true).await;
        let estudiante = insert_user(&pool, UserRole::Estudiante, true).await;
        let curso = CursoService::create_curso(&pool, docente, create_dto())
            .await
            .unwrap();
        enroll_in_curso(&pool, curso.datos.id, estudiante).await;

        let activos = CursoService::get_cursos_activos(&pool).await.unwrap();
        assert_eq!(activos.len(), 1);
        assert_eq!(activos[0].cantidad_estudiantes, 1);
        assert_eq!(activos[0].materias, vec!["Álgebra", "Geometría"]);

        let propios = CursoService::get_cursos_docente(&pool, docente).await.unwrap();
        assert_eq!(propios.len(), 1);

        let inscritos = CursoService::get_cursos_estudiante(&pool, estudiante)
            .await
            .unwrap();
        assert_eq!(inscritos[0].id, curso.datos.id);

        let ajenos = CursoService::get_cursos_docente(&pool, Uuid::new_v4())
            .await
            .unwrap();
        assert!(ajenos.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_curso(pool: PgPool) {
        let docente = insert_user(&pool, UserRole::Docente, true).await;
        let curso = CursoService::create_curso(&pool, docente, create_dto())
            .await
            .unwrap();
        let caller = auth_user(docente, UserRole::Docente);

        let updated = CursoService::update_curso(
            &pool,
            &caller,
            curso.datos.id,
            UpdateCursoDto {
                seccion: Some("B".to_string()),
                anio_estudiantil: Some(NumberOrText::Number(4.0)),
                materias: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.datos.seccion, "B");
        assert_eq!(updated.datos.anio_estudiantil, 4);
        assert_eq!(updated.datos.nombre, "Matemáticas 3A");
        assert!(updated.materias.is_empty());

        let err = CursoService::update_curso(
            &pool,
            &caller,
            curso.datos.id,
            UpdateCursoDto {
                anio_academico: Some(NumberOrText::Number(2200.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), ANIO_ACADEMICO_INVALIDO);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_curso_permissions(pool: PgPool) {
        let owner = insert_user(&pool, UserRole::Docente, true).await;
        let other = insert_user(&pool, UserRole::Docente, true).await;
        let admin = insert_user(&pool, UserRole::Admin, true).await;
        let curso = CursoService::create_curso(&pool, owner, create_dto())
            .await
            .unwrap();

        let err = CursoService::update_curso(
            &pool,
            &auth_user(other, UserRole::Docente),
            curso.datos.id,
            UpdateCursoDto::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "No puedes editar este curso.");

        assert!(
            CursoService::update_curso(
                &pool,
                &auth_user(admin, UserRole::Admin),
                curso.datos.id,
                UpdateCursoDto::default(),
            )
            .await
            .is_ok()
        );

        let err = CursoService::update_curso(
            &pool,
            &auth_user(admin, UserRole::Admin),
            Uuid::new_v4(),
            UpdateCursoDto::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Curso no encontrado.");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_curso_duplicate(pool: PgPool) {
        let admin = insert_user(&pool, UserRole::Admin, true).await;
        CursoService::create_curso(&pool, admin, create_dto())
            .await
            .unwrap();
        let other = CursoService::create_curso(
            &pool,
            admin,
            CreateCursoDto {
                seccion: Some("B".to_string()),
                ..create_dto()
            },
        )
        .await
        .unwrap();

        let err = CursoService::update_curso(
            &pool,
            &auth_user(admin, UserRole::Admin),
            other.datos.id,
            UpdateCursoDto {
                seccion: Some("A".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_curso_cascades(pool: PgPool) {
        let docente = insert_user(&pool, UserRole::Docente, true).await;
        let other = insert_user(&pool, UserRole::Docente, true).await;
        let curso = CursoService::create_curso(&pool, docente, create_dto())
            .await
            .unwrap();
        let clase = insert_clase(&pool, docente, curso.datos.id).await;
        insert_actividad(&pool, docente, curso.datos.id, Some(clase), next_week()).await;

        let err = CursoService::delete_curso(
            &pool,
            &auth_user(other, UserRole::Docente),
            curso.datos.id,
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), "No puedes eliminar este curso.");

        let deleted = CursoService::delete_curso(
            &pool,
            &auth_user(docente, UserRole::Docente),
            curso.datos.id,
        )
        .await
        .unwrap();
        assert_eq!(deleted.datos.id, curso.datos.id);

        let remaining: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM clases) + (SELECT COUNT(*) FROM actividades)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(remaining, 0);
    }
}
