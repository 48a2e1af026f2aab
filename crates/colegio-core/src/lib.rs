//! # Colegio Core
//!
//! Core types shared by every crate of the Colegio API:
//!
//! - [`errors`]: the [`AppError`] type and its JSON response
//! - [`pagination`]: page-based pagination parameters and metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: lenient deserialization helpers for request bodies and queries
//!
//! # Example
//!
//! ```ignore
//! use colegio_core::{AppError, hash_password};
//!
//! let hash = hash_password("secreto123")?;
//! return Err(AppError::not_found(anyhow::anyhow!("Curso no encontrado.")));
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
