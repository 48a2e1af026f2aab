use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_governor::GovernorLayer;

use crate::state::AppState;

use super::controller::{login_user, ping, register_user};

/// `/register` and `/login` sit behind the auth rate limiter.
pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let governor = Arc::new(state.rate_limit_config.auth_governor_config());

    let limited = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .layer(GovernorLayer::new(governor));

    Router::new().merge(limited).route("/ping", get(ping))
}
