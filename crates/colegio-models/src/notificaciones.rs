use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use colegio_core::PaginationMeta;
use colegio_core::serde::deserialize_optional_bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notificacion_tipo", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificacionTipo {
    Nota,
    Actividad,
    General,
    Sistema,
    Recordatorio,
    Alerta,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notificacion {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub titulo: String,
    pub mensaje: String,
    pub tipo: NotificacionTipo,
    pub entrega_id: Option<Uuid>,
    pub leido: bool,
    pub fecha: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificacionesQuery {
    /// `true` or `false`; anything else lists every notificacion.
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    #[param(value_type = Option<String>)]
    pub leido: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificacionesResponse {
    pub ok: bool,
    pub notificaciones: Vec<Notificacion>,
    pub no_leidas: i64,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificacionResponse {
    pub ok: bool,
    pub msg: String,
    pub notificacion: Notificacion,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarcarLeidasResponse {
    pub ok: bool,
    pub msg: String,
    pub actualizadas: u64,
}
