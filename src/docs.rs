use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use colegio_core::{PaginationMeta, PaginationParams};
use colegio_models::actividades::{Actividad, ActividadDetalle, ActividadEstado, ActividadTipo, Lapso, Recurso};
use colegio_models::clases::{Clase, ClaseDetalle, ClaseListItem, Horario};
use colegio_models::cursos::{Curso, CursoResumen, Materia};
use colegio_models::entregas::{Entrega, EntregaDetalle, EntregaEstado, ResumenActividad};
use colegio_models::notificaciones::{Notificacion, NotificacionTipo};
use colegio_models::{ErrorResponse, MessageResponse, User, UserRole};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::ping,
        crate::modules::protected::controller::protegida,
        crate::modules::protected::controller::solo_admin,
        crate::modules::protected::controller::solo_docentes,
        crate::modules::admin::controller::validar_usuario,
        crate::modules::admin::controller::get_pendientes,
        crate::modules::admin::controller::rechazar_usuario,
        crate::modules::usuarios::controller::get_usuarios,
        crate::modules::docentes::controller::create_docente,
        crate::modules::docentes::controller::get_docentes,
        crate::modules::docentes::controller::update_docente,
        crate::modules::docentes::controller::delete_docente,
        crate::modules::estadisticas::controller::get_estadisticas,
        crate::modules::cursos::controller::create_curso,
        crate::modules::cursos::controller::create_curso_docente,
        crate::modules::cursos::controller::asignar_estudiantes,
        crate::modules::cursos::controller::get_cursos,
        crate::modules::cursos::controller::get_cursos_docente,
        crate::modules::cursos::controller::get_cursos_estudiante,
        crate::modules::cursos::controller::get_curso_by_id,
        crate::modules::cursos::controller::update_curso,
        crate::modules::cursos::controller::delete_curso,
        crate::modules::clases::controller::create_clase,
        crate::modules::clases::controller::get_clases,
        crate::modules::clases::controller::get_clases_enriquecidas,
        crate::modules::clases::controller::get_clase_by_id,
        crate::modules::clases::controller::update_clase,
        crate::modules::clases::controller::delete_clase,
        crate::modules::clases::controller::asignar_estudiantes,
        crate::modules::clases::controller::get_clases_docente,
        crate::modules::clases::controller::get_estudiantes_disponibles,
        crate::modules::clases::controller::get_clases_estudiante,
        crate::modules::actividades::controller::create_actividad,
        crate::modules::actividades::controller::get_actividades,
        crate::modules::actividades::controller::get_actividades_estudiante,
        crate::modules::actividades::controller::update_actividad,
        crate::modules::actividades::controller::delete_actividad,
        crate::modules::actividades::controller::notificar_actividad,
        crate::modules::entregas::controller::registrar_entrega,
        crate::modules::entregas::controller::get_entregas_actividad,
        crate::modules::entregas::controller::get_entregas_curso,
        crate::modules::entregas::controller::calificar_entrega,
        crate::modules::entregas::controller::get_mis_entregas,
        crate::modules::notificaciones::controller::get_notificaciones,
        crate::modules::notificaciones::controller::marcar_leida,
        crate::modules::notificaciones::controller::marcar_todas_leidas,
    ),
    components(
        schemas(
            User,
            UserRole,
            Curso,
            CursoResumen,
            Materia,
            Clase,
            ClaseDetalle,
            ClaseListItem,
            Horario,
            Actividad,
            ActividadDetalle,
            ActividadTipo,
            ActividadEstado,
            Lapso,
            Recurso,
            Entrega,
            EntregaDetalle,
            EntregaEstado,
            ResumenActividad,
            Notificacion,
            NotificacionTipo,
            MessageResponse,
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Auth", description = "Registration, login and session check"),
        (name = "Protected", description = "Role gate checks"),
        (name = "Admin", description = "Account validation"),
        (name = "Usuarios", description = "User listings by role"),
        (name = "Docentes", description = "Docente management"),
        (name = "Estadisticas", description = "User statistics"),
        (name = "Cursos", description = "Cursos, materias and enrolment"),
        (name = "Clases", description = "Clases, horarios and enrolment"),
        (name = "Actividades", description = "Assignments and their notification"),
        (name = "Entregas", description = "Submissions and grading"),
        (name = "Notificaciones", description = "User notifications"),
        (name = "Docente", description = "Docente panel"),
        (name = "Estudiante", description = "Estudiante panel")
    ),
    info(
        title = "Colegio José Martí API",
        version = "0.1.0",
        description = "Academic management backend: accounts, cursos, clases, actividades, entregas and notificaciones.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_every_module() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/cursos/{id}",
            "/api/actividades/{id}/notificar",
            "/api/entregas/mias",
            "/api/notificaciones/leidas",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let schemes = doc.components.map(|c| c.security_schemes).unwrap_or_default();
        assert!(schemes.contains_key("bearer_auth"));
    }
}
