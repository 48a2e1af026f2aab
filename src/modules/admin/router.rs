use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::state::AppState;

use super::controller::{get_pendientes, rechazar_usuario, validar_usuario};

/// Mounted behind `require_admin`.
pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/validar/{id}", patch(validar_usuario))
        .route("/pendientes", get(get_pendientes))
        .route("/rechazar/{id}", delete(rechazar_usuario))
}
