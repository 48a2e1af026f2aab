use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::{ErrorResponse, UserRole};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireDocente, RequireEstudiante, check_any_role};
use crate::state::AppState;
use crate::validator::{UuidPath, ValidatedJson};

use super::model::{
    ActividadDetalle, ActividadEliminadaResponse, ActividadResponse, ActividadesQuery,
    ActividadesResponse, CreateActividadDto, NotificarActividadResponse, UpdateActividadDto,
};
use super::service::ActividadService;

type NoStore<T> = ([(HeaderName, &'static str); 1], Json<T>);

/// Listings are served with `Cache-Control: no-store`.
fn no_store(actividades: Vec<ActividadDetalle>) -> NoStore<ActividadesResponse> {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(ActividadesResponse {
            ok: true,
            total: actividades.len(),
            actividades,
        }),
    )
}

#[utoipa::path(
    post,
    path = "/api/actividades",
    request_body = CreateActividadDto,
    responses(
        (status = 201, description = "Actividad creada correctamente", body = ActividadResponse),
        (status = 400, description = "Campos obligatorios ausentes o valores inválidos", body = ErrorResponse),
        (status = 403, description = "Requiere rol docente", body = ErrorResponse),
        (status = 404, description = "Curso no encontrado.", body = ErrorResponse)
    ),
    tag = "Actividades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_actividad(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
    ValidatedJson(dto): ValidatedJson<CreateActividadDto>,
) -> Result<(StatusCode, Json<ActividadResponse>), AppError> {
    let actividad =
        ActividadService::create_actividad(&state.db, auth_user.user_id()?, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ActividadResponse {
            ok: true,
            msg: "Actividad creada correctamente".to_string(),
            actividad,
        }),
    ))
}

/// Docentes see their own actividades; estudiantes see those of their clases and cursos
#[utoipa::path(
    get,
    path = "/api/actividades",
    params(ActividadesQuery),
    responses(
        (status = 200, description = "Listado de actividades", body = ActividadesResponse),
        (status = 400, description = "Filtro inválido", body = ErrorResponse),
        (status = 403, description = "Requiere rol docente o estudiante", body = ErrorResponse),
        (status = 404, description = "Curso no encontrado.", body = ErrorResponse)
    ),
    tag = "Actividades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_actividades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ActividadesQuery>,
) -> Result<NoStore<ActividadesResponse>, AppError> {
    let role = check_any_role(&auth_user, &[UserRole::Docente, UserRole::Estudiante])?;
    let user_id = auth_user.user_id()?;

    let actividades = match role {
        UserRole::Docente => {
            ActividadService::get_actividades_docente(&state.db, user_id, &query).await?
        }
        _ => ActividadService::get_actividades_estudiante(&state.db, user_id, &query).await?,
    };

    Ok(no_store(actividades))
}

/// Actividades visible to the calling estudiante
#[utoipa::path(
    get,
    path = "/api/estudiante/actividades",
    params(ActividadesQuery),
    responses(
        (status = 200, description = "Actividades del estudiante", body = ActividadesResponse),
        (status = 403, description = "Requiere rol estudiante", body = ErrorResponse)
    ),
    tag = "Estudiante",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_actividades_estudiante(
    State(state): State<AppState>,
    RequireEstudiante(auth_user): RequireEstudiante,
    Query(query): Query<ActividadesQuery>,
) -> Result<NoStore<ActividadesResponse>, AppError> {
    let actividades =
        ActividadService::get_actividades_estudiante(&state.db, auth_user.user_id()?, &query)
            .await?;
    Ok(no_store(actividades))
}

#[utoipa::path(
    put,
    path = "/api/actividades/{id}",
    params(("id" = Uuid, Path, description = "Actividad ID")),
    request_body = UpdateActividadDto,
    responses(
        (status = 200, description = "Actividad actualizada correctamente", body = ActividadResponse),
        (status = 400, description = "Valores inválidos o curso sin estudiantes", body = ErrorResponse),
        (status = 403, description = "La actividad o el curso no pertenecen al docente", body = ErrorResponse),
        (status = 404, description = "Actividad no encontrada.", body = ErrorResponse)
    ),
    tag = "Actividades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_actividad(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
    UuidPath(id): UuidPath,
    ValidatedJson(dto): ValidatedJson<UpdateActividadDto>,
) -> Result<Json<ActividadResponse>, AppError> {
    let actividad =
        ActividadService::update_actividad(&state.db, auth_user.user_id()?, id, dto).await?;

    Ok(Json(ActividadResponse {
        ok: true,
        msg: "Actividad actualizada correctamente".to_string(),
        actividad,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/actividades/{id}",
    params(("id" = Uuid, Path, description = "Actividad ID")),
    responses(
        (status = 200, description = "Actividad eliminada correctamente", body = ActividadEliminadaResponse),
        (status = 403, description = "No tienes permiso para eliminar esta actividad.", body = ErrorResponse),
        (status = 404, description = "Actividad no encontrada.", body = ErrorResponse)
    ),
    tag = "Actividades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_actividad(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
    UuidPath(id): UuidPath,
) -> Result<Json<ActividadEliminadaResponse>, AppError> {
    let actividad = ActividadService::delete_actividad(&state.db, auth_user.user_id()?, id).await?;

    Ok(Json(ActividadEliminadaResponse {
        ok: true,
        msg: "Actividad eliminada correctamente".to_string(),
        actividad_id: actividad.id,
        titulo: actividad.titulo,
    }))
}

/// Notify enrolled estudiantes that have not been notified yet
#[utoipa::path(
    post,
    path = "/api/actividades/{id}/notificar",
    params(("id" = Uuid, Path, description = "Actividad ID")),
    responses(
        (status = 200, description = "Notificación enviada a N estudiantes", body = NotificarActividadResponse),
        (status = 403, description = "No tienes permiso para notificar esta actividad.", body = ErrorResponse),
        (status = 404, description = "Actividad no encontrada.", body = ErrorResponse)
    ),
    tag = "Actividades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn notificar_actividad(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
    UuidPath(id): UuidPath,
) -> Result<Json<NotificarActividadResponse>, AppError> {
    let response =
        match ActividadService::notificar_actividad(&state.db, auth_user.user_id()?, id).await? {
            Some(notificados) => NotificarActividadResponse {
                ok: true,
                msg: format!("Notificación enviada a {} estudiantes", notificados.len()),
                notificados,
            },
            None => NotificarActividadResponse {
                ok: true,
                msg: "No hay estudiantes registrados en la clase para notificar.".to_string(),
                notificados: Vec::new(),
            },
        };

    Ok(Json(response))
}
