pub mod actividades;
pub mod admin;
pub mod auth;
pub mod clases;
pub mod cursos;
pub mod docentes;
pub mod entregas;
pub mod estadisticas;
pub mod health;
pub mod notificaciones;
pub mod protected;
pub mod usuarios;

pub use self::auth::model::LoginRequest;
pub use colegio_models::User;
