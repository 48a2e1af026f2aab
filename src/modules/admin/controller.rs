use axum::{Json, extract::State};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::AppError;
use colegio_models::ErrorResponse;
use colegio_models::users::{PendientesResponse, UserActionResponse};

use crate::state::AppState;
use crate::validator::UuidPath;

use super::service::AdminService;

/// Approve a registered account so it can log in
#[utoipa::path(
    patch,
    path = "/api/admin/validar/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Usuario validado correctamente", body = UserActionResponse),
        (status = 400, description = "El usuario ya está validado", body = ErrorResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 404, description = "Usuario no encontrado", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn validar_usuario(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<UserActionResponse>, AppError> {
    let user = AdminService::validar_usuario(&state.db, id).await?;

    Ok(Json(UserActionResponse {
        ok: true,
        msg: "Usuario validado correctamente".to_string(),
        user,
    }))
}

/// Estudiantes waiting for validation, oldest first
#[utoipa::path(
    get,
    path = "/api/admin/pendientes",
    responses(
        (status = 200, description = "Usuarios pendientes", body = PendientesResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_pendientes(
    State(state): State<AppState>,
) -> Result<Json<PendientesResponse>, AppError> {
    let pendientes = AdminService::get_pendientes(&state.db).await?;

    Ok(Json(PendientesResponse {
        ok: true,
        msg: format!("Se encontraron {} usuarios pendientes", pendientes.len()),
        pendientes,
    }))
}

/// Reject a registration, deleting the account
#[utoipa::path(
    delete,
    path = "/api/admin/rechazar/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Usuario rechazado y eliminado", body = UserActionResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse),
        (status = 404, description = "Usuario no encontrado", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn rechazar_usuario(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<UserActionResponse>, AppError> {
    let user = AdminService::rechazar_usuario(&state.db, id).await?;

    Ok(Json(UserActionResponse {
        ok: true,
        msg: "Usuario rechazado y eliminado".to_string(),
        user,
    }))
}
