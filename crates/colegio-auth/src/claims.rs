use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access token claims.
///
/// `role` is kept as the raw string so that a token carrying an unknown role
/// still decodes and can be rejected by the role middleware with a 403.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub is_validated: bool,
    pub exp: usize,
    pub iat: usize,
}
