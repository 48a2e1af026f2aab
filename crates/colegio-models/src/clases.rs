use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use colegio_core::serde::deserialize_optional_uuid;

use crate::cursos::CursoRef;
use crate::users::{EstudianteRef, UserSummary};

pub const HORARIO_DIA_POR_DEFECTO: &str = "Por asignar";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Horario {
    pub dia: String,
    pub hora_inicio: String,
    pub hora_fin: String,
}

impl Default for Horario {
    fn default() -> Self {
        Self {
            dia: HORARIO_DIA_POR_DEFECTO.to_string(),
            hora_inicio: String::new(),
            hora_fin: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HorarioInput {
    #[serde(default)]
    pub dia: Option<String>,
    #[serde(default)]
    pub hora_inicio: Option<String>,
    #[serde(default)]
    pub hora_fin: Option<String>,
}

impl HorarioInput {
    /// Fills blanks from `base`.
    pub fn merge_into(self, base: Horario) -> Horario {
        fn pick(value: Option<String>, fallback: String) -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => fallback,
            }
        }

        Horario {
            dia: pick(self.dia, base.dia),
            hora_inicio: pick(self.hora_inicio, base.hora_inicio),
            hora_fin: pick(self.hora_fin, base.hora_fin),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ClaseRow {
    pub id: Uuid,
    pub nombre: String,
    pub docente_id: Uuid,
    pub curso_id: Uuid,
    pub horario_dia: String,
    pub horario_hora_inicio: String,
    pub horario_hora_fin: String,
    pub materia: String,
    pub descripcion: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Clase {
    pub id: Uuid,
    pub nombre: String,
    pub docente_id: Uuid,
    pub curso_id: Uuid,
    pub horario: Horario,
    pub materia: String,
    pub descripcion: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClaseRow> for Clase {
    fn from(row: ClaseRow) -> Self {
        Self {
            id: row.id,
            nombre: row.nombre,
            docente_id: row.docente_id,
            curso_id: row.curso_id,
            horario: Horario {
                dia: row.horario_dia,
                hora_inicio: row.horario_hora_inicio,
                hora_fin: row.horario_hora_fin,
            },
            materia: row.materia,
            descripcion: row.descripcion,
            activo: row.activo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// List entry: docente and curso populated, estudiantes counted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaseListItem {
    #[serde(flatten)]
    pub clase: Clase,
    pub docente: Option<UserSummary>,
    pub curso: Option<CursoRef>,
    pub cantidad_estudiantes: usize,
}

/// Fully populated clase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaseDetalle {
    #[serde(flatten)]
    pub clase: Clase,
    pub docente: Option<UserSummary>,
    pub curso: Option<CursoRef>,
    pub estudiantes: Vec<EstudianteRef>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaseDto {
    #[serde(default)]
    #[validate(length(max = 255, message = "El nombre de la clase es demasiado largo"))]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub docente_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub curso_id: Option<Uuid>,
    #[serde(default)]
    pub horario: Option<HorarioInput>,
    #[serde(default)]
    pub materia: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClaseDto {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub docente_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub curso_id: Option<Uuid>,
    #[serde(default)]
    pub horario: Option<HorarioInput>,
    #[serde(default)]
    pub materia: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsignarEstudiantesClaseDto {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub clase_id: Option<Uuid>,
    #[serde(default)]
    pub estudiantes_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaseResponse {
    pub ok: bool,
    pub msg: String,
    pub clase: ClaseDetalle,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaseDetalleResponse {
    pub ok: bool,
    pub clase: ClaseDetalle,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClasesResponse {
    pub ok: bool,
    pub total: usize,
    pub clases: Vec<ClaseListItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClasesDetalleResponse {
    pub ok: bool,
    pub total: usize,
    pub clases: Vec<ClaseDetalle>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AsignacionClaseResponse {
    pub ok: bool,
    pub msg: String,
    pub asignados: usize,
    pub clase: ClaseDetalle,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EstudiantesResponse {
    pub ok: bool,
    pub total: usize,
    pub estudiantes: Vec<EstudianteRef>,
}
