use axum::Json;
use tracing::instrument;

use colegio_models::{ErrorResponse, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireAdminOrDocente};

#[utoipa::path(
    get,
    path = "/api/protegida",
    responses(
        (status = 200, description = "Acceso autorizado", body = MessageResponse),
        (status = 401, description = "Token ausente o inválido", body = ErrorResponse)
    ),
    tag = "Protected",
    security(("bearer_auth" = []))
)]
#[instrument(skip(auth_user), fields(user = %auth_user.0.sub))]
pub async fn protegida(auth_user: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("Acceso autorizado"))
}

#[utoipa::path(
    get,
    path = "/api/solo-admin",
    responses(
        (status = 200, description = "Bienvenido, administrador", body = MessageResponse),
        (status = 401, description = "Token ausente o inválido", body = ErrorResponse),
        (status = 403, description = "Rol no permitido", body = ErrorResponse)
    ),
    tag = "Protected",
    security(("bearer_auth" = []))
)]
pub async fn solo_admin(RequireAdmin(_auth_user): RequireAdmin) -> Json<MessageResponse> {
    Json(MessageResponse::new("Bienvenido, administrador"))
}

#[utoipa::path(
    get,
    path = "/api/solo-docentes",
    responses(
        (status = 200, description = "Bienvenido, docente", body = MessageResponse),
        (status = 401, description = "Token ausente o inválido", body = ErrorResponse),
        (status = 403, description = "Rol no permitido", body = ErrorResponse)
    ),
    tag = "Protected",
    security(("bearer_auth" = []))
)]
pub async fn solo_docentes(
    RequireAdminOrDocente(_auth_user): RequireAdminOrDocente,
) -> Json<MessageResponse> {
    Json(MessageResponse::new("Bienvenido, docente"))
}
