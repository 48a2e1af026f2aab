use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{protegida, solo_admin, solo_docentes};

pub fn init_protected_router() -> Router<AppState> {
    Router::new()
        .route("/protegida", get(protegida))
        .route("/solo-admin", get(solo_admin))
        .route("/solo-docentes", get(solo_docentes))
}
