use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use colegio_auth::{Claims, verify_token};
use colegio_core::AppError;
use colegio_models::UserRole;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Token inválido o expirado".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// `None` when the token carries an unknown role.
    pub fn role(&self) -> Option<UserRole> {
        self.0.role.parse().ok()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }
}

/// Pulls the token out of an `Authorization` header value.
pub fn bearer_token(header_value: Option<&str>) -> Result<&str, AppError> {
    let value =
        header_value.ok_or_else(|| AppError::unauthorized("Token no proporcionado".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Formato de token inválido".to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = bearer_token(header_value)?;
        let claims = verify_token(token, &state.jwt_config)?;

        let user = AuthUser(claims);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
