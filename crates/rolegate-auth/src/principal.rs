use std::collections::BTreeSet;

use rolegate_core::Permission;

use crate::claims::Claims;

/// The authenticated caller of one request.
///
/// Built from verified access token claims and attached to the request
/// extensions by the authorization guard. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub email: String,
    pub permissions: BTreeSet<Permission>,
}

impl Principal {
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Identifiers outside the registry are dropped, so a token naming a
/// capability this build does not know can never satisfy a guard.
impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        let permissions = claims
            .permissions
            .iter()
            .filter_map(|name| match name.parse::<Permission>() {
                Ok(permission) => Some(permission),
                Err(e) => {
                    tracing::debug!(subject = %claims.sub, error = %e, "Ignoring token permission");
                    None
                }
            })
            .collect();

        Self {
            subject: claims.sub,
            email: claims.email,
            permissions,
        }
    }
}
