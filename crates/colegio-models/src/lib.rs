//! # Colegio Models
//!
//! Database rows, enums, request DTOs and response envelopes shared by the
//! API and the CLI. JSON field names are camelCase and every success
//! envelope carries `"ok": true`.

pub mod actividades;
pub mod auth;
pub mod clases;
pub mod common;
pub mod cursos;
pub mod docentes;
pub mod entregas;
pub mod estadisticas;
pub mod notificaciones;
pub mod users;

pub use common::{ErrorResponse, MessageResponse};
pub use users::{EstudianteRef, User, UserRole, UserSummary};
