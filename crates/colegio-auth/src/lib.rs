//! # Colegio Auth
//!
//! JWT access tokens for the Colegio API.
//!
//! - [`claims`]: the [`Claims`] embedded in every token
//! - [`jwt`]: [`create_access_token`] and [`verify_token`]
//!
//! ```ignore
//! use colegio_auth::{create_access_token, verify_token};
//!
//! let token = create_access_token(user_id, "docente@colegio.com", "docente", true, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, "docente");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
