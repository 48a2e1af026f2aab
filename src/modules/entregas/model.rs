pub use colegio_models::entregas::*;
