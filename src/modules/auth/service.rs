use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use colegio_auth::create_access_token;
use colegio_config::JwtConfig;
use colegio_core::{AppError, hash_password, verify_password};
use colegio_models::users::{User, UserWithPassword};

use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};
use crate::utils::academic::non_blank;
use crate::utils::auth_helpers::USER_COLUMNS;

use super::model::{LoginRequest, LoginResponse, RegisterRequest};

pub struct AuthService;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    /// Self-registration always yields an unvalidated estudiante.
    #[instrument(skip(db, dto))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequest) -> Result<User, AppError> {
        let email = normalize_email(&dto.email);

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&email)
            .fetch_one(db)
            .await?;

        if exists {
            return Err(AppError::bad_request(anyhow!("El usuario ya existe")));
        }

        let hashed_password = hash_password(&dto.password)?;
        let nombre = non_blank(dto.nombre.as_deref()).unwrap_or_default();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (nombre, email, password, role, is_validated)
             VALUES ($1, $2, $3, 'estudiante', FALSE)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&nombre)
        .bind(&email)
        .bind(&hashed_password)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow!("El usuario ya existe"));
            }
            AppError::from(e)
        })?;

        track_user_registered(user.role.as_str());
        tracing::info!(user_id = %user.id, "Estudiante registrado, pendiente de validación");

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let Some(found) = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {}, password FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(&email)
        .fetch_optional(db)
        .await?
        else {
            track_user_login_failure("not_found");
            return Err(AppError::not_found(anyhow!("Usuario no encontrado")));
        };

        if !verify_password(&dto.password, &found.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized("Contraseña incorrecta".to_string()));
        }

        let user = found.user;

        if !user.is_validated {
            track_user_login_failure("not_validated");
            return Err(AppError::forbidden(
                "Cuenta pendiente de validación por el administrador".to_string(),
            ));
        }

        if !user.activo {
            track_user_login_failure("inactive");
            return Err(AppError::forbidden("Cuenta desactivada".to_string()));
        }

        let token = create_access_token(
            user.id,
            &user.email,
            user.role.as_str(),
            user.is_validated,
            jwt_config,
        )?;

        track_jwt_issued();
        track_user_login_success(user.role.as_str());

        Ok(LoginResponse {
            ok: true,
            msg: "Login exitoso".to_string(),
            token,
            user,
        })
    }
}
