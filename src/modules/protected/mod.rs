//! Routes for checking a token against each role gate.

pub mod controller;
pub mod router;

pub use router::init_protected_router;
