use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use colegio_core::AppError;

fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("El campo '{}' no es válido", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("Falta el encabezado 'Content-Type: application/json'"),
        );
    }

    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("desconocido");
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("El campo '{}' es obligatorio", field),
        );
    }

    if error_msg.contains("invalid type") || error_msg.contains("did not match any variant") {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("Tipo de dato inválido en la solicitud"),
        );
    }

    if error_msg.contains("invalid character") || error_msg.contains("invalid length") {
        return AppError::new(StatusCode::BAD_REQUEST, anyhow!("Identificador inválido"));
    }

    AppError::new(
        StatusCode::BAD_REQUEST,
        anyhow!("Cuerpo de la solicitud inválido"),
    )
}

/// JSON body that has been deserialized and passed its `validator` rules.
///
/// Malformed bodies answer 400, failed rules 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(|errors| {
            AppError::unprocessable(anyhow!("{}", format_errors(&errors)))
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Single UUID path parameter; malformed ids answer 400 `ID inválido`.
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| UuidPath(id))
            .map_err(|_| AppError::bad_request(anyhow!("ID inválido")))
    }
}
