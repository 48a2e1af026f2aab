pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_actividades_router, init_estudiante_actividades_router};
