//! Authentication and authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor (bearer token → claims)
//! - [`role`]: role layers and extractors built on top of it
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the JWT and caches the claims in the request extensions
//! 3. A role layer or extractor compares the claimed role with its allow-list
//! 4. The handler runs only if both checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::role::RequireDocente;
//!
//! async fn create_actividad(RequireDocente(auth_user): RequireDocente) -> impl IntoResponse {
//!     let docente_id = auth_user.user_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
