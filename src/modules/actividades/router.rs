use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_actividad, delete_actividad, get_actividades, get_actividades_estudiante,
    notificar_actividad, update_actividad,
};

pub fn init_actividades_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_actividad).get(get_actividades))
        .route("/{id}", put(update_actividad).delete(delete_actividad))
        .route("/{id}/notificar", post(notificar_actividad))
}

/// Nested under `/api/estudiante`.
pub fn init_estudiante_actividades_router() -> Router<AppState> {
    Router::new().route("/actividades", get(get_actividades_estudiante))
}
