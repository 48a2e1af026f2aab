use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_usuarios;

/// Mounted behind `require_admin_or_docente`.
pub fn init_usuarios_router() -> Router<AppState> {
    Router::new().route("/", get(get_usuarios))
}
