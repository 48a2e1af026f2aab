use axum::{Json, extract::State};
use tracing::instrument;

use colegio_core::AppError;
use colegio_models::ErrorResponse;
use colegio_models::estadisticas::EstadisticasResponse;

use crate::state::AppState;

use super::service::EstadisticasService;

/// User counts for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/estadisticas",
    responses(
        (status = 200, description = "Conteos de usuarios", body = EstadisticasResponse),
        (status = 403, description = "Requiere rol admin", body = ErrorResponse)
    ),
    tag = "Estadisticas",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_estadisticas(
    State(state): State<AppState>,
) -> Result<Json<EstadisticasResponse>, AppError> {
    let estadisticas = EstadisticasService::get_estadisticas(&state.db).await?;
    Ok(Json(EstadisticasResponse {
        ok: true,
        estadisticas,
    }))
}
