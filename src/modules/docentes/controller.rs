use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::{ErrorResponse, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{UuidPath, ValidatedJson};

use super::model::{CreateDocenteDto, DocenteResponse, DocentesResponse, UpdateDocenteDto};
use super::service::DocenteService;

#[utoipa::path(
    post,
    path = "/api/docentes",
    request_body = CreateDocenteDto,
    responses(
        (status = 201, description = "Docente creado correctamente", body = DocenteResponse),
        (status = 400, description = "Todos los campos son obligatorios", body = ErrorResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 409, description = "El correo ya está registrado", body = ErrorResponse)
    ),
    tag = "Docentes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_docente(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateDocenteDto>,
) -> Result<(StatusCode, Json<DocenteResponse>), AppError> {
    let admin_id = auth_user.user_id()?;
    let docente = DocenteService::create_docente(&state.db, admin_id, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(DocenteResponse {
            ok: true,
            msg: "Docente creado correctamente".to_string(),
            docente,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/docentes",
    responses(
        (status = 200, description = "Docentes, más recientes primero", body = DocentesResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse)
    ),
    tag = "Docentes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_docentes(State(state): State<AppState>) -> Result<Json<DocentesResponse>, AppError> {
    let docentes = DocenteService::get_docentes(&state.db).await?;
    Ok(Json(DocentesResponse { ok: true, docentes }))
}

#[utoipa::path(
    put,
    path = "/api/docentes/{id}",
    params(("id" = Uuid, Path, description = "Docente ID")),
    request_body = UpdateDocenteDto,
    responses(
        (status = 200, description = "Docente actualizado correctamente", body = DocenteResponse),
        (status = 404, description = "Docente no encontrado", body = ErrorResponse),
        (status = 409, description = "El correo ya está registrado", body = ErrorResponse)
    ),
    tag = "Docentes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_docente(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    ValidatedJson(dto): ValidatedJson<UpdateDocenteDto>,
) -> Result<Json<DocenteResponse>, AppError> {
    let docente = DocenteService::update_docente(&state.db, id, dto).await?;

    Ok(Json(DocenteResponse {
        ok: true,
        msg: "Docente actualizado correctamente".to_string(),
        docente,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/docentes/{id}",
    params(("id" = Uuid, Path, description = "Docente ID")),
    responses(
        (status = 200, description = "Docente eliminado correctamente", body = MessageResponse),
        (status = 404, description = "Docente no encontrado", body = ErrorResponse)
    ),
    tag = "Docentes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_docente(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    DocenteService::delete_docente(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Docente eliminado correctamente")))
}
