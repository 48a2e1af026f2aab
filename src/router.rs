use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::{
    require_admin, require_admin_or_docente, require_docente, require_estudiante,
};
use crate::modules::actividades::{init_actividades_router, init_estudiante_actividades_router};
use crate::modules::admin::init_admin_router;
use crate::modules::auth::init_auth_router;
use crate::modules::clases::{
    init_clases_router, init_docente_clases_router, init_estudiante_clases_router,
};
use crate::modules::cursos::{init_cursos_router, init_docente_cursos_router};
use crate::modules::docentes::init_docentes_router;
use crate::modules::entregas::init_entregas_router;
use crate::modules::estadisticas::init_estadisticas_router;
use crate::modules::health::init_health_router;
use crate::modules::notificaciones::init_notificaciones_router;
use crate::modules::protected::init_protected_router;
use crate::modules::usuarios::init_usuarios_router;
use crate::state::AppState;

const BODY_LIMIT: usize = 10 * 1024 * 1024;

fn api_router(state: &AppState) -> Router<AppState> {
    let admin_only = || middleware::from_fn_with_state(state.clone(), require_admin);

    Router::new()
        .nest("/auth", init_auth_router(state))
        .merge(init_protected_router())
        .nest("/admin", init_admin_router().route_layer(admin_only()))
        .nest(
            "/usuarios",
            init_usuarios_router().route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_admin_or_docente,
            )),
        )
        .nest("/docentes", init_docentes_router().route_layer(admin_only()))
        .nest(
            "/estadisticas",
            init_estadisticas_router().route_layer(admin_only()),
        )
        .nest("/cursos", init_cursos_router())
        .nest("/clases", init_clases_router())
        .nest("/actividades", init_actividades_router())
        .nest("/entregas", init_entregas_router())
        .nest("/notificaciones", init_notificaciones_router())
        .nest(
            "/docente",
            init_docente_cursos_router()
                .merge(init_docente_clases_router())
                .route_layer(middleware::from_fn_with_state(state.clone(), require_docente)),
        )
        .nest(
            "/estudiante",
            init_estudiante_clases_router()
                .merge(init_estudiante_actividades_router())
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_estudiante,
                )),
        )
        .layer(GovernorLayer::new(Arc::new(
            state.rate_limit_config.general_governor_config(),
        )))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest("/api", api_router(&state))
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
