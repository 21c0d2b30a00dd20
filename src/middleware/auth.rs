use async_trait::async_trait;
use axum::http::{HeaderMap, header};

use rolegate_auth::{Principal, verify_token};
use rolegate_config::JwtConfig;
use rolegate_core::{AppError, Permission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Decides whether an authenticated caller holds a permission.
///
/// Implementations may await an external policy service; the guard chain
/// awaits the decision before moving on.
#[async_trait]
pub trait AuthorizationGate: Send + Sync + 'static {
    async fn check(&self, principal: &Principal, permission: Permission) -> Decision;
}

/// Allows exactly the permissions carried by the caller's access token.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantedPermissions;

#[async_trait]
impl AuthorizationGate for GrantedPermissions {
    async fn check(&self, principal: &Principal, permission: Permission) -> Decision {
        if principal.has_permission(permission) {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Resolves the caller from `Authorization: Bearer <token>`.
///
/// Every failure here is `Unauthenticated`; whether the caller may do
/// anything is decided separately by the gate.
pub fn authenticate(headers: &HeaderMap, jwt_config: &JwtConfig) -> Result<Principal, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthenticated("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthenticated("Invalid authorization header format"))?;

    let claims = verify_token(token, jwt_config)?;

    Ok(Principal::from(claims))
}
