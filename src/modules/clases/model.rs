pub use colegio_models::clases::*;
