pub use colegio_models::auth::*;
