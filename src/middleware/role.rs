//! Role-based authorization for Axum.
//!
//! Three ways to restrict a route:
//! 1. Layers built with `middleware::from_fn_with_state` and the `require_*` functions
//! 2. Extractors such as [`RequireDocente`] for handler-level checks
//! 3. [`check_any_role`] inside controller logic

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use colegio_core::AppError;
use colegio_models::UserRole;

use crate::metrics::track_authorization_check;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn request_path(parts: &Parts) -> String {
    parts
        .extensions
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string())
}

/// Checks that the authenticated user has one of `allowed_roles`.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/cursos", post(create_curso))
///     .layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, vec![UserRole::Docente])
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    let path = request_path(&parts);
    authorize(&auth_user, &allowed_roles, &path)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

fn authorize(auth_user: &AuthUser, allowed_roles: &[UserRole], path: &str) -> Result<UserRole, AppError> {
    let user_role = parse_role_from_string(&auth_user.0.role)?;

    if !allowed_roles.contains(&user_role) {
        track_authorization_check(false, user_role.as_str());
        return Err(access_denied(allowed_roles, path));
    }

    track_authorization_check(true, user_role.as_str());
    Ok(user_role)
}

fn access_denied(allowed_roles: &[UserRole], path: &str) -> AppError {
    let roles = allowed_roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    AppError::forbidden(format!(
        "Acceso denegado: se requiere uno de los siguientes roles → {} (ruta: {})",
        roles, path
    ))
}

async fn layer_for(
    state: AppState,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Response {
    match require_roles(State(state), req, next, allowed_roles).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    layer_for(state, req, next, vec![UserRole::Admin]).await
}

pub async fn require_docente(State(state): State<AppState>, req: Request, next: Next) -> Response {
    layer_for(state, req, next, vec![UserRole::Docente]).await
}

pub async fn require_estudiante(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    layer_for(state, req, next, vec![UserRole::Estudiante]).await
}

pub async fn require_admin_or_docente(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    layer_for(state, req, next, vec![UserRole::Admin, UserRole::Docente]).await
}

/// Generates an extractor that admits only the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = colegio_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                $crate::middleware::role::check_roles_for_path(
                    &auth_user,
                    &[$($role),+],
                    parts,
                )?;
                Ok($name(auth_user))
            }
        }
    };
}

#[doc(hidden)]
pub fn check_roles_for_path(
    auth_user: &AuthUser,
    allowed_roles: &[UserRole],
    parts: &Parts,
) -> Result<UserRole, AppError> {
    authorize(auth_user, allowed_roles, &request_path(parts))
}

require_roles!(RequireAdmin, [UserRole::Admin]);
require_roles!(RequireDocente, [UserRole::Docente]);
require_roles!(RequireEstudiante, [UserRole::Estudiante]);
require_roles!(RequireAdminOrDocente, [UserRole::Admin, UserRole::Docente]);

/// Role check for controller logic; returns the caller's role.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<UserRole, AppError> {
    let user_role = parse_role_from_string(&auth_user.0.role)?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Acceso denegado: se requiere uno de los siguientes roles → {}",
            allowed_roles
                .iter()
                .map(UserRole::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    Ok(user_role)
}

/// Case-insensitive; unknown or empty roles are rejected with 403.
pub fn parse_role_from_string(role_str: &str) -> Result<UserRole, AppError> {
    role_str
        .parse::<UserRole>()
        .map_err(|_| AppError::forbidden("Rol no definido o inválido".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use colegio_auth::Claims;

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "test@colegio.com".to_string(),
            role: role.to_string(),
            is_validated: true,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_parse_role_from_string() {
        assert!(matches!(parse_role_from_string("admin"), Ok(UserRole::Admin)));
        assert!(matches!(parse_role_from_string("DOCENTE"), Ok(UserRole::Docente)));
        assert!(matches!(
            parse_role_from_string("Estudiante"),
            Ok(UserRole::Estudiante)
        ));

        let err = parse_role_from_string("").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Rol no definido o inválido");
    }

    #[test]
    fn test_authorize_message_lists_roles_and_path() {
        let err = authorize(
            &auth_user("estudiante"),
            &[UserRole::Admin, UserRole::Docente],
            "/api/cursos",
        )
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(
            err.message(),
            "Acceso denegado: se requiere uno de los siguientes roles → admin, docente (ruta: /api/cursos)"
        );
    }

    #[test]
    fn test_authorize_allows_listed_role() {
        let role = authorize(&auth_user("docente"), &[UserRole::Docente], "/x").unwrap();
        assert_eq!(role, UserRole::Docente);
    }

    #[test]
    fn test_check_any_role() {
        assert!(check_any_role(&auth_user("admin"), &[UserRole::Admin]).is_ok());
        assert!(check_any_role(&auth_user("docente"), &[UserRole::Admin]).is_err());
        assert!(check_any_role(&auth_user("root"), &[UserRole::Admin]).is_err());
    }
}
