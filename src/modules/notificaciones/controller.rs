use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::instrument;
use uuid::Uuid;

use colegio_core::{AppError, PaginationParams};
use colegio_models::ErrorResponse;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::UuidPath;

use super::model::{
    MarcarLeidasResponse, NotificacionResponse, NotificacionesQuery, NotificacionesResponse,
};
use super::service::NotificacionService;

fn invalid_query(_: QueryRejection) -> AppError {
    AppError::bad_request(anyhow::anyhow!("Parámetros de consulta inválidos"))
}

/// The caller's notificaciones with the unread count
#[utoipa::path(
    get,
    path = "/api/notificaciones",
    params(NotificacionesQuery, PaginationParams),
    responses(
        (status = 200, description = "Notificaciones del usuario", body = NotificacionesResponse),
        (status = 400, description = "Parámetros de consulta inválidos", body = ErrorResponse),
        (status = 401, description = "Token inválido o ausente", body = ErrorResponse)
    ),
    tag = "Notificaciones",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_notificaciones(
    State(state): State<AppState>,
    auth_user: AuthUser,
    filters: Result<Query<NotificacionesQuery>, QueryRejection>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<NotificacionesResponse>, AppError> {
    let Query(filters) = filters.map_err(invalid_query)?;
    let Query(pagination) = pagination.map_err(invalid_query)?;

    let page = NotificacionService::get_notificaciones(
        &state.db,
        auth_user.user_id()?,
        filters.leido,
        &pagination,
    )
    .await?;

    Ok(Json(NotificacionesResponse {
        ok: true,
        notificaciones: page.notificaciones,
        no_leidas: page.no_leidas,
        meta: page.meta,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/notificaciones/{id}/leida",
    params(("id" = Uuid, Path, description = "Notificación ID")),
    responses(
        (status = 200, description = "Notificación marcada como leída", body = NotificacionResponse),
        (status = 404, description = "Notificación no encontrada", body = ErrorResponse)
    ),
    tag = "Notificaciones",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn marcar_leida(
    State(state): State<AppState>,
    auth_user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<NotificacionResponse>, AppError> {
    let notificacion = NotificacionService::marcar_leida(&state.db, auth_user.user_id()?, id).await?;

    Ok(Json(NotificacionResponse {
        ok: true,
        msg: "Notificación marcada como leída".to_string(),
        notificacion,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/notificaciones/leidas",
    responses(
        (status = 200, description = "N notificaciones marcadas como leídas", body = MarcarLeidasResponse)
    ),
    tag = "Notificaciones",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn marcar_todas_leidas(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MarcarLeidasResponse>, AppError> {
    let actualizadas = NotificacionService::marcar_todas_leidas(&state.db, auth_user.user_id()?).await?;

    Ok(Json(MarcarLeidasResponse {
        ok: true,
        msg: format!("{} notificaciones marcadas como leídas", actualizadas),
        actualizadas,
    }))
}
