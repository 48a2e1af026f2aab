use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::ErrorResponse;

use crate::middleware::role::{RequireDocente, RequireEstudiante};
use crate::state::AppState;
use crate::validator::{UuidPath, ValidatedJson};

use super::model::{
    CalificacionResponse, CalificarEntregaDto, EntregaDetalle, EntregaResponse, EntregasResponse,
    RegistrarEntregaDto,
};
use super::service::EntregaService;

fn entregas_response(entregas: Vec<EntregaDetalle>) -> Json<EntregasResponse> {
    Json(EntregasResponse {
        ok: true,
        total: entregas.len(),
        entregas,
    })
}

/// Submit an entrega for an actividad of the caller's clase or curso
#[utoipa::path(
    post,
    path = "/api/entregas",
    request_body = RegistrarEntregaDto,
    responses(
        (status = 201, description = "Entrega registrada correctamente", body = EntregaResponse),
        (status = 400, description = "Datos obligatorios ausentes o URL inválida", body = ErrorResponse),
        (status = 403, description = "El estudiante no está asignado a la clase", body = ErrorResponse),
        (status = 404, description = "Actividad no encontrada", body = ErrorResponse),
        (status = 409, description = "Ya registraste una entrega para esta actividad", body = ErrorResponse)
    ),
    tag = "Entregas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn registrar_entrega(
    State(state): State<AppState>,
    RequireEstudiante(auth_user): RequireEstudiante,
    ValidatedJson(dto): ValidatedJson<RegistrarEntregaDto>,
) -> Result<(StatusCode, Json<EntregaResponse>), AppError> {
    let entrega = EntregaService::registrar_entrega(&state.db, auth_user.user_id()?, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(EntregaResponse {
            ok: true,
            msg: "Entrega registrada correctamente".to_string(),
            entrega,
        }),
    ))
}

/// Entregas submitted for an actividad
#[utoipa::path(
    get,
    path = "/api/entregas/{id}",
    params(("id" = Uuid, Path, description = "Actividad ID")),
    responses(
        (status = 200, description = "Entregas de la actividad; vacío si no existe", body = EntregasResponse),
        (status = 403, description = "Requiere rol docente", body = ErrorResponse)
    ),
    tag = "Entregas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_entregas_actividad(
    State(state): State<AppState>,
    _auth_user: RequireDocente,
    UuidPath(id): UuidPath,
) -> Result<Json<EntregasResponse>, AppError> {
    let entregas = EntregaService::get_entregas_actividad(&state.db, id).await?;
    Ok(entregas_response(entregas))
}

#[utoipa::path(
    get,
    path = "/api/entregas/curso/{curso_id}",
    params(("curso_id" = Uuid, Path, description = "Curso ID")),
    responses(
        (status = 200, description = "Entregas del curso", body = EntregasResponse),
        (status = 403, description = "Requiere rol docente", body = ErrorResponse)
    ),
    tag = "Entregas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_entregas_curso(
    State(state): State<AppState>,
    _auth_user: RequireDocente,
    UuidPath(curso_id): UuidPath,
) -> Result<Json<EntregasResponse>, AppError> {
    let entregas = EntregaService::get_entregas_curso(&state.db, curso_id).await?;
    Ok(entregas_response(entregas))
}

/// Grade an entrega and notify its estudiante
#[utoipa::path(
    put,
    path = "/api/entregas/{id}",
    params(("id" = Uuid, Path, description = "Entrega ID")),
    request_body = CalificarEntregaDto,
    responses(
        (status = 200, description = "Entrega calificada y notificada correctamente", body = CalificacionResponse),
        (status = 400, description = "La calificación debe estar entre 0 y 20.", body = ErrorResponse),
        (status = 403, description = "No tienes permiso para calificar esta entrega.", body = ErrorResponse),
        (status = 404, description = "Entrega no encontrada", body = ErrorResponse)
    ),
    tag = "Entregas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn calificar_entrega(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
    UuidPath(id): UuidPath,
    ValidatedJson(dto): ValidatedJson<CalificarEntregaDto>,
) -> Result<Json<CalificacionResponse>, AppError> {
    let (entrega, resumen_actividad) =
        EntregaService::calificar_entrega(&state.db, auth_user.user_id()?, id, dto).await?;

    Ok(Json(CalificacionResponse {
        ok: true,
        msg: "Entrega calificada y notificada correctamente".to_string(),
        entrega,
        resumen_actividad,
    }))
}

/// Entregas of the calling estudiante, newest first
#[utoipa::path(
    get,
    path = "/api/entregas/mias",
    responses(
        (status = 200, description = "Entregas del estudiante", body = EntregasResponse),
        (status = 403, description = "Requiere rol estudiante", body = ErrorResponse)
    ),
    tag = "Entregas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_mis_entregas(
    State(state): State<AppState>,
    RequireEstudiante(auth_user): RequireEstudiante,
) -> Result<Json<EntregasResponse>, AppError> {
    let entregas = EntregaService::get_entregas_estudiante(&state.db, auth_user.user_id()?).await?;
    Ok(entregas_response(entregas))
}
