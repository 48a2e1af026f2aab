//! Application configuration, loaded from environment variables.
//!
//! The types live in the `colegio-config` crate; this module re-exports them
//! under the paths the rest of the application uses.
//!
//! - [`cors`]: allowed frontend origins
//! - [`jwt`]: token secret and lifetime
//! - [`rate_limit`]: limiter settings
//! - [`server`]: bind addresses
//!
//! # Example
//!
//! ```ignore
//! use crate::config::jwt::JwtConfig;
//!
//! let jwt_config = JwtConfig::from_env();
//! ```

pub use colegio_config::{cors, jwt, rate_limit, server};
