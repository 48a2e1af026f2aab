//! # Colegio Config
//!
//! Configuration loaded from environment variables:
//!
//! - [`jwt`]: token secret and lifetime
//! - [`cors`]: allowed frontend origins
//! - [`rate_limit`]: limiter settings for the auth endpoints and the rest of the API
//! - [`server`]: HTTP and metrics bind addresses
//!
//! ```ignore
//! use colegio_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::{ClientIpKeyExtractor, RateLimitConfig};
pub use server::ServerConfig;
