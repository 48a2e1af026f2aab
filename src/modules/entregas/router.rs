use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    calificar_entrega, get_entregas_actividad, get_entregas_curso, get_mis_entregas,
    registrar_entrega,
};

pub fn init_entregas_router() -> Router<AppState> {
    Router::new()
        .route("/", post(registrar_entrega))
        .route("/mias", get(get_mis_entregas))
        .route("/curso/{curso_id}", get(get_entregas_curso))
        .route("/{id}", get(get_entregas_actividad).put(calificar_entrega))
}
