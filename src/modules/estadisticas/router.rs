use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_estadisticas;

/// Mounted behind `require_admin`.
pub fn init_estadisticas_router() -> Router<AppState> {
    Router::new().route("/", get(get_estadisticas))
}
