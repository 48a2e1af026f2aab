use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{create_docente, delete_docente, get_docentes, update_docente};

/// Mounted behind `require_admin`.
pub fn init_docentes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_docente).get(get_docentes))
        .route("/{id}", put(update_docente).delete(delete_docente))
}
