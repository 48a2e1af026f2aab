pub use colegio_models::actividades::*;
