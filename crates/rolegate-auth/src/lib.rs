//! # Rolegate Auth
//!
//! Authentication types and JWT utilities for the rolegate API.
//!
//! - [`claims`]: access token and password reset token claims
//! - [`jwt`]: token creation and verification
//! - [`principal`]: the authenticated caller attached to a request
//!
//! # Example
//!
//! ```ignore
//! use rolegate_auth::{Principal, create_access_token, verify_token};
//! use rolegate_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "admin@example.com", vec!["VIEW_USERS".into()], &config)?;
//! let principal = Principal::from(verify_token(&token, &config)?);
//! ```

pub mod claims;
pub mod jwt;
pub mod principal;

// Re-export commonly used types at crate root
pub use claims::{Claims, ResetTokenClaims};
pub use jwt::{create_access_token, create_reset_token, verify_reset_token, verify_token};
pub use principal::Principal;
