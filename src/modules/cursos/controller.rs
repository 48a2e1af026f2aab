use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::ErrorResponse;

use crate::middleware::role::{RequireAdmin, RequireAdminOrDocente, RequireDocente, RequireEstudiante};
use crate::state::AppState;
use crate::validator::{UuidPath, ValidatedJson};

use super::model::{
    AsignacionCursoResponse, AsignarEstudiantesCursoDto, CreateCursoDto, CursoDetalleResponse,
    CursoResponse, CursoResumen, CursosResumenResponse, UpdateCursoDto,
};
use super::service::CursoService;

fn resumen_response(cursos: Vec<CursoResumen>) -> Json<CursosResumenResponse> {
    Json(CursosResumenResponse {
        ok: true,
        total: cursos.len(),
        cursos,
    })
}

/// Create a curso as admin, optionally assigning its docente
#[utoipa::path(
    post,
    path = "/api/cursos",
    request_body = CreateCursoDto,
    responses(
        (status = 201, description = "Curso creado correctamente", body = CursoResponse),
        (status = 400, description = "Campos obligatorios ausentes o años fuera de rango", body = ErrorResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 409, description = "Ya existe un curso con esos datos.", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_curso(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCursoDto>,
) -> Result<(StatusCode, Json<CursoResponse>), AppError> {
    let curso = CursoService::create_curso(&state.db, auth_user.user_id()?, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(CursoResponse {
            ok: true,
            msg: "Curso creado correctamente".to_string(),
            curso,
        }),
    ))
}

/// Create a curso owned by the calling docente
#[utoipa::path(
    post,
    path = "/api/docente/cursos",
    request_body = CreateCursoDto,
    responses(
        (status = 201, description = "Curso creado correctamente", body = CursoResponse),
        (status = 400, description = "Campos obligatorios ausentes o años fuera de rango", body = ErrorResponse),
        (status = 403, description = "Docente no validado o rol no permitido", body = ErrorResponse),
        (status = 409, description = "Ya existe un curso con esos datos.", body = ErrorResponse)
    ),
    tag = "Docente",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_curso_docente(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
    ValidatedJson(dto): ValidatedJson<CreateCursoDto>,
) -> Result<(StatusCode, Json<CursoResponse>), AppError> {
    let curso = CursoService::create_curso(&state.db, auth_user.user_id()?, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(CursoResponse {
            ok: true,
            msg: "Curso creado correctamente".to_string(),
            curso,
        }),
    ))
}

/// Enrol validated estudiantes into a curso
#[utoipa::path(
    post,
    path = "/api/cursos/asignar-estudiantes",
    request_body = AsignarEstudiantesCursoDto,
    responses(
        (status = 200, description = "Estudiantes asignados", body = AsignacionCursoResponse),
        (status = 400, description = "ID de curso o lista de estudiantes inválida", body = ErrorResponse),
        (status = 403, description = "El docente no es dueño del curso", body = ErrorResponse),
        (status = 404, description = "Curso no encontrado.", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn asignar_estudiantes(
    State(state): State<AppState>,
    RequireAdminOrDocente(auth_user): RequireAdminOrDocente,
    ValidatedJson(dto): ValidatedJson<AsignarEstudiantesCursoDto>,
) -> Result<Json<AsignacionCursoResponse>, AppError> {
    let result = CursoService::asignar_estudiantes(&state.db, &auth_user, dto).await?;

    if result.asignados == 0 {
        return Ok(Json(AsignacionCursoResponse {
            ok: true,
            msg: "Todos los estudiantes ya estaban asignados o no son válidos.".to_string(),
            asignados: 0,
            curso: None,
        }));
    }

    Ok(Json(AsignacionCursoResponse {
        ok: true,
        msg: format!(
            "{} estudiante(s) asignado(s) correctamente",
            result.asignados
        ),
        asignados: result.asignados,
        curso: Some(result.curso),
    }))
}

/// Active cursos
#[utoipa::path(
    get,
    path = "/api/cursos",
    responses(
        (status = 200, description = "Cursos activos", body = CursosResumenResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_cursos(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
) -> Result<Json<CursosResumenResponse>, AppError> {
    let cursos = CursoService::get_cursos_activos(&state.db).await?;
    Ok(resumen_response(cursos))
}

/// Cursos owned by the calling docente, newest first
///
/// Also served at `/api/docente/cursos`.
#[utoipa::path(
    get,
    path = "/api/cursos/docente",
    responses(
        (status = 200, description = "Cursos del docente", body = CursosResumenResponse),
        (status = 403, description = "Requiere rol docente", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_cursos_docente(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
) -> Result<Json<CursosResumenResponse>, AppError> {
    let cursos = CursoService::get_cursos_docente(&state.db, auth_user.user_id()?).await?;
    Ok(resumen_response(cursos))
}

/// Cursos the calling estudiante is enrolled in
#[utoipa::path(
    get,
    path = "/api/cursos/estudiante",
    responses(
        (status = 200, description = "Cursos del estudiante", body = CursosResumenResponse),
        (status = 403, description = "Requiere rol estudiante", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_cursos_estudiante(
    State(state): State<AppState>,
    RequireEstudiante(auth_user): RequireEstudiante,
) -> Result<Json<CursosResumenResponse>, AppError> {
    let cursos = CursoService::get_cursos_estudiante(&state.db, auth_user.user_id()?).await?;
    Ok(resumen_response(cursos))
}

#[utoipa::path(
    get,
    path = "/api/cursos/{id}",
    params(("id" = Uuid, Path, description = "Curso ID")),
    responses(
        (status = 200, description = "Curso con resumen", body = CursoDetalleResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 404, description = "Curso no encontrado.", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_curso_by_id(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
    UuidPath(id): UuidPath,
) -> Result<Json<CursoDetalleResponse>, AppError> {
    let curso = CursoService::get_curso(&state.db, id).await?;
    let resumen = CursoResumen::from(&curso);

    Ok(Json(CursoDetalleResponse {
        ok: true,
        curso,
        resumen,
    }))
}

#[utoipa::path(
    put,
    path = "/api/cursos/{id}",
    params(("id" = Uuid, Path, description = "Curso ID")),
    request_body = UpdateCursoDto,
    responses(
        (status = 200, description = "Curso actualizado correctamente", body = CursoResponse),
        (status = 400, description = "Años fuera de rango", body = ErrorResponse),
        (status = 403, description = "No puedes editar este curso.", body = ErrorResponse),
        (status = 404, description = "Curso no encontrado.", body = ErrorResponse),
        (status = 409, description = "Ya existe un curso con esos datos.", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_curso(
    State(state): State<AppState>,
    RequireAdminOrDocente(auth_user): RequireAdminOrDocente,
    UuidPath(id): UuidPath,
    ValidatedJson(dto): ValidatedJson<UpdateCursoDto>,
) -> Result<Json<CursoResponse>, AppError> {
    let curso = CursoService::update_curso(&state.db, &auth_user, id, dto).await?;

    Ok(Json(CursoResponse {
        ok: true,
        msg: "Curso actualizado correctamente".to_string(),
        curso,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/cursos/{id}",
    params(("id" = Uuid, Path, description = "Curso ID")),
    responses(
        (status = 200, description = "Curso eliminado correctamente", body = CursoResponse),
        (status = 403, description = "No puedes eliminar este curso.", body = ErrorResponse),
        (status = 404, description = "Curso no encontrado.", body = ErrorResponse)
    ),
    tag = "Cursos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_curso(
    State(state): State<AppState>,
    RequireAdminOrDocente(auth_user): RequireAdminOrDocente,
    UuidPath(id): UuidPath,
) -> Result<Json<CursoResponse>, AppError> {
    let curso = CursoService::delete_curso(&state.db, &auth_user, id).await?;

    Ok(Json(CursoResponse {
        ok: true,
        msg: "Curso eliminado correctamente".to_string(),
        curso,
    }))
}
