//! JWT creation and verification.
//!
//! Access tokens embed the caller's permission identifiers so the
//! authorization gate can decide without a lookup. Reset tokens carry a
//! different claim set and never verify as access tokens.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use rolegate_config::JwtConfig;
use rolegate_core::AppError;

use crate::claims::{Claims, ResetTokenClaims};

/// Creates an access token carrying `permissions`.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    permissions: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.access_token_expiry) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        permissions,
        exp,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Verifies an access token's signature and expiry.
///
/// # Errors
///
/// Returns an unauthenticated error for any malformed, expired or wrongly
/// signed token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        AppError::unauthenticated("Invalid or expired token")
    })
}

pub fn create_reset_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.reset_token_expiry) as usize;

    let claims = ResetTokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        password_reset: true,
        exp,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create reset token: {}", e)))
}

pub fn verify_reset_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<ResetTokenClaims, AppError> {
    decode::<ResetTokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthenticated("Invalid or expired reset token"))
}
