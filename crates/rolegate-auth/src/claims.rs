//! JWT claim structures.
//!
//! - [`Claims`]: access token claims carrying the caller's permission names
//! - [`ResetTokenClaims`]: short-lived claims issued by the forget-password flow

use serde::{Deserialize, Serialize};

/// JWT claims for access tokens.
///
/// `permissions` holds registry identifiers (`"VIEW_USERS"`, ...) derived from
/// the user's roles at login, so authorization needs no lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Permission identifiers granted to the user
    pub permissions: Vec<String>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// JWT claims for password reset tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetTokenClaims {
    pub sub: String,
    pub email: String,
    /// Always `true`; keeps a reset token from passing as an access token.
    pub password_reset: bool,
    pub exp: usize,
    pub iat: usize,
}
