use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use colegio_core::serde::{NumberOrText, deserialize_optional_uuid, deserialize_some};

use crate::users::{EstudianteRef, UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Materia {
    pub nombre: String,
    pub docente_asignado: Option<Uuid>,
}

/// Subjects may be sent as plain names or as `{nombre, docenteAsignado}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MateriaInput {
    Nombre(String),
    Detalle {
        nombre: String,
        #[serde(
            default,
            rename = "docenteAsignado",
            deserialize_with = "deserialize_optional_uuid"
        )]
        docente_asignado: Option<Uuid>,
    },
}

impl MateriaInput {
    /// `None` for blank names.
    pub fn into_materia(self) -> Option<Materia> {
        let (nombre, docente_asignado) = match self {
            MateriaInput::Nombre(nombre) => (nombre, None),
            MateriaInput::Detalle {
                nombre,
                docente_asignado,
            } => (nombre, docente_asignado),
        };
        let nombre = nombre.trim().to_string();
        (!nombre.is_empty()).then_some(Materia {
            nombre,
            docente_asignado,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursoRow {
    pub id: Uuid,
    pub nombre: String,
    pub anio_academico: i32,
    pub anio_estudiantil: i32,
    pub seccion: String,
    pub docente_id: Option<Uuid>,
    pub descripcion: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A curso with its docente, materias and estudiantes populated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Curso {
    #[serde(flatten)]
    pub datos: CursoRow,
    pub docente: Option<UserSummary>,
    pub materias: Vec<Materia>,
    pub estudiantes: Vec<EstudianteRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursoResumen {
    pub id: Uuid,
    pub nombre: String,
    pub anio_academico: i32,
    pub anio_estudiantil: i32,
    pub seccion: String,
    pub cantidad_estudiantes: usize,
    pub estudiantes: Vec<EstudianteRef>,
    pub materias: Vec<String>,
    pub descripcion: String,
    pub activo: bool,
}

impl From<&Curso> for CursoResumen {
    fn from(curso: &Curso) -> Self {
        Self {
            id: curso.datos.id,
            nombre: curso.datos.nombre.clone(),
            anio_academico: curso.datos.anio_academico,
            anio_estudiantil: curso.datos.anio_estudiantil,
            seccion: curso.datos.seccion.clone(),
            cantidad_estudiantes: curso.estudiantes.len(),
            estudiantes: curso.estudiantes.clone(),
            materias: curso.materias.iter().map(|m| m.nombre.clone()).collect(),
            descripcion: curso.datos.descripcion.clone(),
            activo: curso.datos.activo,
        }
    }
}

/// Minimal curso reference embedded in clases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursoRef {
    pub id: Uuid,
    pub nombre: String,
    pub anio_academico: i32,
    pub anio_estudiantil: i32,
    pub seccion: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCursoDto {
    #[serde(default)]
    #[validate(length(max = 255, message = "El nombre del curso es demasiado largo"))]
    pub nombre: Option<String>,
    #[serde(default)]
    pub anio_academico: Option<NumberOrText>,
    #[serde(default)]
    pub anio_estudiantil: Option<NumberOrText>,
    #[serde(default)]
    pub seccion: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Only honoured when an admin creates the curso.
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub docente_id: Option<Uuid>,
    #[serde(default)]
    pub materias: Option<Vec<MateriaInput>>,
    /// Estudiante ids; invalid or repeated ids are ignored.
    #[serde(default)]
    pub estudiantes: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCursoDto {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub anio_academico: Option<NumberOrText>,
    #[serde(default)]
    pub anio_estudiantil: Option<NumberOrText>,
    #[serde(default)]
    pub seccion: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    /// `null` clears every materia.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<Vec<MateriaInput>>)]
    pub materias: Option<Option<Vec<MateriaInput>>>,
    #[serde(default)]
    pub activo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsignarEstudiantesCursoDto {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub curso_id: Option<Uuid>,
    #[serde(default)]
    pub estudiantes_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CursoResponse {
    pub ok: bool,
    pub msg: String,
    pub curso: Curso,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CursosResumenResponse {
    pub ok: bool,
    pub total: usize,
    pub cursos: Vec<CursoResumen>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CursosResponse {
    pub ok: bool,
    pub total: usize,
    pub cursos: Vec<Curso>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CursoDetalleResponse {
    pub ok: bool,
    pub curso: Curso,
    pub resumen: CursoResumen,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AsignacionCursoResponse {
    pub ok: bool,
    pub msg: String,
    pub asignados: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curso: Option<Curso>,
}
