use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    asignar_estudiantes, create_clase, delete_clase, get_clase_by_id, get_clases,
    get_clases_docente, get_clases_enriquecidas, get_clases_estudiante,
    get_estudiantes_disponibles, update_clase,
};

pub fn init_clases_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_clase).get(get_clases))
        .route("/enriquecidas", get(get_clases_enriquecidas))
        .route("/asignar-estudiantes", post(asignar_estudiantes))
        .route(
            "/{id}",
            get(get_clase_by_id).put(update_clase).delete(delete_clase),
        )
}

/// Nested under `/api/docente`.
pub fn init_docente_clases_router() -> Router<AppState> {
    Router::new()
        .route("/clases", get(get_clases_docente))
        .route("/clases/asignar-estudiantes", post(asignar_estudiantes))
        .route("/estudiantes", get(get_estudiantes_disponibles))
}

/// Nested under `/api/estudiante`.
pub fn init_estudiante_clases_router() -> Router<AppState> {
    Router::new().route("/clases", get(get_clases_estudiante))
}
