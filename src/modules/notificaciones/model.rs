pub use colegio_models::notificaciones::*;
