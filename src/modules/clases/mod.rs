pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_clases_router, init_docente_clases_router, init_estudiante_clases_router};
