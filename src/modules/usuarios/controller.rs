use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::instrument;

use colegio_core::AppError;
use colegio_models::ErrorResponse;
use colegio_models::users::{UsuariosQuery, UsuariosResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::service::UsuarioService;

/// List users of one role, optionally filtered by validation state
#[utoipa::path(
    get,
    path = "/api/usuarios",
    params(UsuariosQuery),
    responses(
        (status = 200, description = "Usuarios del rol solicitado", body = UsuariosResponse),
        (status = 400, description = "Parámetro 'role' ausente o inválido", body = ErrorResponse),
        (status = 403, description = "Docentes solo pueden listar estudiantes", body = ErrorResponse)
    ),
    tag = "Usuarios",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_usuarios(
    State(state): State<AppState>,
    auth_user: AuthUser,
    filters: Result<Query<UsuariosQuery>, QueryRejection>,
) -> Result<Json<UsuariosResponse>, AppError> {
    let Query(filters) = filters.map_err(|_| {
        AppError::bad_request(anyhow::anyhow!("Parámetros de consulta inválidos"))
    })?;

    let role = UsuarioService::resolve_role(&auth_user, filters.role.as_deref())?;
    let is_validated = UsuarioService::resolve_is_validated(&auth_user, role, filters.is_validated);
    let usuarios = UsuarioService::get_usuarios(&state.db, role, is_validated).await?;

    let msg = usuarios
        .is_empty()
        .then(|| format!("No hay usuarios registrados con el rol '{}'", role));

    Ok(Json(UsuariosResponse {
        ok: true,
        msg,
        usuarios,
    }))
}
