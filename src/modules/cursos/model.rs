pub use colegio_models::cursos::*;
