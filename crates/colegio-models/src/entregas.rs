use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use colegio_core::serde::{NumberOrText, deserialize_optional_uuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "entrega_estado", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntregaEstado {
    Pendiente,
    Entregado,
    Vencido,
    Revisado,
}

impl EntregaEstado {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntregaEstado::Pendiente => "pendiente",
            EntregaEstado::Entregado => "entregado",
            EntregaEstado::Vencido => "vencido",
            EntregaEstado::Revisado => "revisado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entrega {
    pub id: Uuid,
    pub actividad_id: Uuid,
    pub clase_id: Option<Uuid>,
    pub curso_id: Uuid,
    pub estudiante_id: Uuid,
    pub archivo_url: Option<String>,
    pub fecha_entrega: DateTime<Utc>,
    pub calificacion: Option<f64>,
    pub observaciones: Option<String>,
    pub estado: EntregaEstado,
    pub fecha_revision: Option<DateTime<Utc>>,
    pub notificacion_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entrega joined with its estudiante and actividad for docente listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntregaDetalle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entrega: Entrega,
    pub estudiante_nombre: String,
    pub estudiante_email: String,
    pub actividad_titulo: String,
    pub actividad_fecha_entrega: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarEntregaDto {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub actividad_id: Option<Uuid>,
    #[serde(default)]
    pub archivo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CalificarEntregaDto {
    #[serde(default)]
    pub calificacion: Option<NumberOrText>,
    #[serde(default)]
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumenActividad {
    pub cantidad_revisadas: i64,
    /// Two decimals, e.g. `"15.50"`.
    pub promedio_calificaciones: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalificacionResponse {
    pub ok: bool,
    pub msg: String,
    pub entrega: Entrega,
    pub resumen_actividad: ResumenActividad,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntregaResponse {
    pub ok: bool,
    pub msg: String,
    pub entrega: Entrega,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntregasResponse {
    pub ok: bool,
    pub total: usize,
    pub entregas: Vec<EntregaDetalle>,
}
