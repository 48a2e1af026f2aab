use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use colegio_core::AppError;
use colegio_models::ErrorResponse;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SessionResponse, SessionUser,
};
use super::service::AuthService;

/// Register a new estudiante account (pending admin validation)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Usuario registrado, pendiente de validación", body = RegisterResponse),
        (status = 400, description = "El usuario ya existe o cuerpo inválido", body = ErrorResponse),
        (status = 422, description = "Correo o contraseña no válidos", body = ErrorResponse),
        (status = 429, description = "Demasiadas solicitudes")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = AuthService::register_user(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            ok: true,
            msg: "Usuario registrado correctamente. Pendiente de validación por el administrador"
                .to_string(),
            user,
        }),
    ))
}

/// Login and receive a JWT
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login exitoso", body = LoginResponse),
        (status = 401, description = "Contraseña incorrecta", body = ErrorResponse),
        (status = 403, description = "Cuenta pendiente de validación o desactivada", body = ErrorResponse),
        (status = 404, description = "Usuario no encontrado", body = ErrorResponse),
        (status = 429, description = "Demasiadas solicitudes")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Check that the bearer token is still valid
#[utoipa::path(
    get,
    path = "/api/auth/ping",
    responses(
        (status = 200, description = "Token válido", body = SessionResponse),
        (status = 401, description = "Token ausente, mal formado o expirado", body = ErrorResponse)
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
#[instrument(skip(auth_user))]
pub async fn ping(auth_user: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        ok: true,
        msg: "Token válido".to_string(),
        user: SessionUser::from(&auth_user.0),
    })
}
