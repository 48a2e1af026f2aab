pub use colegio_models::docentes::*;
