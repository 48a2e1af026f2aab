use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use colegio_core::serde::{NumberOrText, deserialize_optional_uuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "actividad_tipo", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActividadTipo {
    Tarea,
    Proyecto,
    Examen,
    Otro,
}

impl ActividadTipo {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActividadTipo::Tarea => "tarea",
            ActividadTipo::Proyecto => "proyecto",
            ActividadTipo::Examen => "examen",
            ActividadTipo::Otro => "otro",
        }
    }
}

impl FromStr for ActividadTipo {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tarea" => Ok(ActividadTipo::Tarea),
            "proyecto" => Ok(ActividadTipo::Proyecto),
            "examen" => Ok(ActividadTipo::Examen),
            "otro" => Ok(ActividadTipo::Otro),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "actividad_estado", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActividadEstado {
    Activa,
    Vencida,
    Borrador,
}

impl FromStr for ActividadEstado {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "activa" => Ok(ActividadEstado::Activa),
            "vencida" => Ok(ActividadEstado::Vencida),
            "borrador" => Ok(ActividadEstado::Borrador),
            _ => Err(()),
        }
    }
}

/// Academic term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lapso")]
pub enum Lapso {
    #[sqlx(rename = "Lapso 1")]
    #[serde(rename = "Lapso 1")]
    Lapso1,
    #[sqlx(rename = "Lapso 2")]
    #[serde(rename = "Lapso 2")]
    Lapso2,
    #[sqlx(rename = "Lapso 3")]
    #[serde(rename = "Lapso 3")]
    Lapso3,
}

impl FromStr for Lapso {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Lapso 1" => Ok(Lapso::Lapso1),
            "Lapso 2" => Ok(Lapso::Lapso2),
            "Lapso 3" => Ok(Lapso::Lapso3),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recurso {
    pub url: String,
    pub tipo: String,
}

/// Resources arrive as bare URLs or as `{url, tipo}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RecursoInput {
    Url(String),
    Detalle {
        url: String,
        #[serde(default)]
        tipo: Option<String>,
    },
}

impl RecursoInput {
    /// Bare URLs become `{url, tipo: "link"}`; blank URLs are dropped.
    pub fn into_recurso(self) -> Option<Recurso> {
        let (url, tipo) = match self {
            RecursoInput::Url(url) => (url, None),
            RecursoInput::Detalle { url, tipo } => (url, tipo),
        };
        let url = url.trim().to_string();
        if url.is_empty() {
            return None;
        }
        let tipo = tipo
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "link".to_string());
        Some(Recurso { url, tipo })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Actividad {
    pub id: Uuid,
    pub titulo: String,
    pub descripcion: String,
    pub tipo: ActividadTipo,
    pub fecha_entrega: DateTime<Utc>,
    pub ponderacion: f64,
    pub materia: String,
    pub lapso: Lapso,
    pub curso_id: Uuid,
    pub clase_id: Option<Uuid>,
    pub docente_id: Uuid,
    #[schema(value_type = Vec<Recurso>)]
    pub recursos: Json<Vec<Recurso>>,
    pub estado: ActividadEstado,
    pub notificada: bool,
    /// Estudiantes already notified about this actividad.
    pub notificada_a: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Actividad with docente, curso and clase names for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActividadDetalle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub actividad: Actividad,
    pub docente_nombre: Option<String>,
    pub docente_email: Option<String>,
    pub curso_nombre: Option<String>,
    pub curso_seccion: Option<String>,
    pub clase_nombre: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActividadDto {
    #[serde(default)]
    #[validate(length(max = 255, message = "El título es demasiado largo"))]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[serde(default)]
    pub fecha_entrega: Option<String>,
    #[serde(default)]
    pub ponderacion: Option<NumberOrText>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub curso_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub clase_id: Option<Uuid>,
    #[serde(default)]
    pub materia: Option<String>,
    #[serde(default)]
    pub lapso: Option<String>,
    #[serde(default)]
    pub recursos: Option<Vec<RecursoInput>>,
    #[serde(default)]
    pub estado: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActividadDto {
    #[serde(default)]
    #[validate(length(max = 255, message = "El título es demasiado largo"))]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub fecha_entrega: Option<String>,
    #[serde(default)]
    pub ponderacion: Option<NumberOrText>,
    #[serde(default)]
    pub materia: Option<String>,
    #[serde(default)]
    pub lapso: Option<String>,
    #[serde(default)]
    pub recursos: Option<Vec<RecursoInput>>,
    #[serde(default)]
    pub estado: Option<String>,
}

/// `todos` or an empty value disables a filter.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActividadesQuery {
    pub curso_id: Option<String>,
    pub clase_id: Option<String>,
    pub tipo: Option<String>,
    pub estado: Option<String>,
    pub materia: Option<String>,
    pub lapso: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActividadResponse {
    pub ok: bool,
    pub msg: String,
    pub actividad: Actividad,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActividadesResponse {
    pub ok: bool,
    pub total: usize,
    pub actividades: Vec<ActividadDetalle>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActividadEliminadaResponse {
    pub ok: bool,
    pub msg: String,
    pub actividad_id: Uuid,
    pub titulo: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificarActividadResponse {
    pub ok: bool,
    pub msg: String,
    pub notificados: Vec<Uuid>,
}
