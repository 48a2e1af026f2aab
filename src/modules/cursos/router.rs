use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    asignar_estudiantes, create_curso, create_curso_docente, delete_curso, get_curso_by_id,
    get_cursos, get_cursos_docente, get_cursos_estudiante, update_curso,
};

pub fn init_cursos_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_curso).get(get_cursos))
        .route("/asignar-estudiantes", post(asignar_estudiantes))
        .route("/docente", get(get_cursos_docente))
        .route("/estudiante", get(get_cursos_estudiante))
        .route(
            "/{id}",
            get(get_curso_by_id).put(update_curso).delete(delete_curso),
        )
}

/// Curso routes of the docente panel, nested under `/api/docente`.
pub fn init_docente_cursos_router() -> Router<AppState> {
    Router::new()
        .route("/cursos", post(create_curso_docente).get(get_cursos_docente))
        .route("/cursos/asignar", post(asignar_estudiantes))
}
