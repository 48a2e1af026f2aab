use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{get_notificaciones, marcar_leida, marcar_todas_leidas};

pub fn init_notificaciones_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notificaciones))
        .route("/leidas", patch(marcar_todas_leidas))
        .route("/{id}/leida", patch(marcar_leida))
}
