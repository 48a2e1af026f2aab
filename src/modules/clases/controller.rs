use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::{ErrorResponse, MessageResponse};

use crate::middleware::role::{RequireAdmin, RequireAdminOrDocente, RequireDocente, RequireEstudiante};
use crate::state::AppState;
use crate::validator::{UuidPath, ValidatedJson};

use super::model::{
    AsignacionClaseResponse, AsignarEstudiantesClaseDto, ClaseDetalleResponse, ClaseListItem,
    ClaseResponse, ClasesDetalleResponse, ClasesResponse, CreateClaseDto, EstudiantesResponse,
    UpdateClaseDto,
};
use super::service::ClaseService;

fn clases_response(clases: Vec<ClaseListItem>) -> Json<ClasesResponse> {
    Json(ClasesResponse {
        ok: true,
        total: clases.len(),
        clases,
    })
}

#[utoipa::path(
    post,
    path = "/api/clases",
    request_body = CreateClaseDto,
    responses(
        (status = 201, description = "Clase creada correctamente", body = ClaseResponse),
        (status = 400, description = "Campos obligatorios ausentes", body = ErrorResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 404, description = "Docente o curso no encontrado", body = ErrorResponse)
    ),
    tag = "Clases",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_clase(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateClaseDto>,
) -> Result<(StatusCode, Json<ClaseResponse>), AppError> {
    let clase = ClaseService::create_clase(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ClaseResponse {
            ok: true,
            msg: "Clase creada correctamente".to_string(),
            clase,
        }),
    ))
}

/// Clases with docente, curso and student count
#[utoipa::path(
    get,
    path = "/api/clases",
    responses(
        (status = 200, description = "Listado de clases", body = ClasesResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse)
    ),
    tag = "Clases",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_clases(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
) -> Result<Json<ClasesResponse>, AppError> {
    let clases = ClaseService::get_clases(&state.db).await?;
    Ok(clases_response(clases))
}

/// Clases with their enrolled estudiantes
#[utoipa::path(
    get,
    path = "/api/clases/enriquecidas",
    responses(
        (status = 200, description = "Clases con estudiantes", body = ClasesDetalleResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse)
    ),
    tag = "Clases",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_clases_enriquecidas(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
) -> Result<Json<ClasesDetalleResponse>, AppError> {
    let clases = ClaseService::get_clases_enriquecidas(&state.db).await?;
    Ok(Json(ClasesDetalleResponse {
        ok: true,
        total: clases.len(),
        clases,
    }))
}

#[utoipa::path(
    get,
    path = "/api/clases/{id}",
    params(("id" = Uuid, Path, description = "Clase ID")),
    responses(
        (status = 200, description = "Clase", body = ClaseDetalleResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 404, description = "Clase no encontrada", body = ErrorResponse)
    ),
    tag = "Clases",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_clase_by_id(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
    UuidPath(id): UuidPath,
) -> Result<Json<ClaseDetalleResponse>, AppError> {
    let clase = ClaseService::get_clase(&state.db, id).await?;
    Ok(Json(ClaseDetalleResponse { ok: true, clase }))
}

#[utoipa::path(
    put,
    path = "/api/clases/{id}",
    params(("id" = Uuid, Path, description = "Clase ID")),
    request_body = UpdateClaseDto,
    responses(
        (status = 200, description = "Clase actualizada correctamente", body = ClaseResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 404, description = "Clase, docente o curso no encontrado", body = ErrorResponse)
    ),
    tag = "Clases",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_clase(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
    UuidPath(id): UuidPath,
    ValidatedJson(dto): ValidatedJson<UpdateClaseDto>,
) -> Result<Json<ClaseResponse>, AppError> {
    let clase = ClaseService::update_clase(&state.db, id, dto).await?;

    Ok(Json(ClaseResponse {
        ok: true,
        msg: "Clase actualizada correctamente".to_string(),
        clase,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/clases/{id}",
    params(("id" = Uuid, Path, description = "Clase ID")),
    responses(
        (status = 200, description = "Clase eliminada correctamente", body = MessageResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 404, description = "Clase no encontrada", body = ErrorResponse)
    ),
    tag = "Clases",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_clase(
    State(state): State<AppState>,
    _auth_user: RequireAdmin,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    ClaseService::delete_clase(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Clase eliminada correctamente")))
}

/// Enrol validated estudiantes into a clase
///
/// Also served at `/api/docente/clases/asignar-estudiantes`.
#[utoipa::path(
    post,
    path = "/api/clases/asignar-estudiantes",
    request_body = AsignarEstudiantesClaseDto,
    responses(
        (status = 200, description = "Estudiantes asignados correctamente (N)", body = AsignacionClaseResponse),
        (status = 400, description = "Clase ID y lista de estudiantes son obligatorios", body = ErrorResponse),
        (status = 403, description = "El docente no es dueño de la clase", body = ErrorResponse),
        (status = 404, description = "Clase no encontrada", body = ErrorResponse)
    ),
    tag = "Clases",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn asignar_estudiantes(
    State(state): State<AppState>,
    RequireAdminOrDocente(auth_user): RequireAdminOrDocente,
    ValidatedJson(dto): ValidatedJson<AsignarEstudiantesClaseDto>,
) -> Result<Json<AsignacionClaseResponse>, AppError> {
    let (asignados, clase) = ClaseService::asignar_estudiantes(&state.db, &auth_user, dto).await?;

    let msg = if asignados == 0 {
        "Todos los estudiantes ya estaban asignados o no son válidos".to_string()
    } else {
        format!("Estudiantes asignados correctamente ({})", asignados)
    };

    Ok(Json(AsignacionClaseResponse {
        ok: true,
        msg,
        asignados,
        clase,
    }))
}

/// Clases taught by the calling docente
#[utoipa::path(
    get,
    path = "/api/docente/clases",
    responses(
        (status = 200, description = "Clases del docente", body = ClasesResponse),
        (status = 403, description = "Requiere rol docente", body = ErrorResponse)
    ),
    tag = "Docente",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_clases_docente(
    State(state): State<AppState>,
    RequireDocente(auth_user): RequireDocente,
) -> Result<Json<ClasesResponse>, AppError> {
    let clases = ClaseService::get_clases_docente(&state.db, auth_user.user_id()?).await?;
    Ok(clases_response(clases))
}

/// Validated, active estudiantes available for enrolment
#[utoipa::path(
    get,
    path = "/api/docente/estudiantes",
    responses(
        (status = 200, description = "Estudiantes disponibles", body = EstudiantesResponse),
        (status = 403, description = "Requiere rol docente", body = ErrorResponse)
    ),
    tag = "Docente",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_estudiantes_disponibles(
    State(state): State<AppState>,
    _auth_user: RequireDocente,
) -> Result<Json<EstudiantesResponse>, AppError> {
    let estudiantes = ClaseService::get_estudiantes_disponibles(&state.db).await?;
    Ok(Json(EstudiantesResponse {
        ok: true,
        total: estudiantes.len(),
        estudiantes,
    }))
}

/// Clases the calling estudiante is enrolled in
#[utoipa::path(
    get,
    path = "/api/estudiante/clases",
    responses(
        (status = 200, description = "Clases del estudiante", body = ClasesResponse),
        (status = 403, description = "Requiere rol estudiante", body = ErrorResponse)
    ),
    tag = "Estudiante",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_clases_estudiante(
    State(state): State<AppState>,
    RequireEstudiante(auth_user): RequireEstudiante,
) -> Result<Json<ClasesResponse>, AppError> {
    let clases = ClaseService::get_clases_estudiante(&state.db, auth_user.user_id()?).await?;
    Ok(clases_response(clases))
}
