//! Permission registry for the rolegate API.
//!
//! Every capability a route can require is a variant of [`Permission`]. The set
//! is closed: naming a permission that does not exist is a compile error, and
//! identifiers that arrive from outside (token claims, request bodies) are
//! parsed against this list and rejected when unknown.
//!
//! The wire form of each permission is its upper snake case identifier, e.g.
//! `VIEW_USERS`.
//!
//! # Example
//!
//! ```ignore
//! use rolegate_core::Permission;
//!
//! let permission: Permission = "CREATE_USER".parse()?;
//! assert_eq!(permission, Permission::CreateUser);
//! assert_eq!(permission.as_str(), "CREATE_USER");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    // =========================================================================
    // Users
    // =========================================================================
    /// List every user
    ViewUsers,
    /// Read a single user
    ViewUserById,
    /// Create users
    CreateUser,
    /// Update users
    UpdateUser,
    /// Delete users
    DeleteUser,

    // =========================================================================
    // Roles
    // =========================================================================
    /// List every role
    ViewRoles,
    /// Read a single role
    ViewRoleById,
    /// Update roles
    UpdateRole,
    /// Delete roles
    DeleteRole,
}

impl Permission {
    pub const ALL: [Permission; 9] = [
        Permission::ViewUsers,
        Permission::ViewUserById,
        Permission::CreateUser,
        Permission::UpdateUser,
        Permission::DeleteUser,
        Permission::ViewRoles,
        Permission::ViewRoleById,
        Permission::UpdateRole,
        Permission::DeleteRole,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::ViewUsers => "VIEW_USERS",
            Permission::ViewUserById => "VIEW_USER_BY_ID",
            Permission::CreateUser => "CREATE_USER",
            Permission::UpdateUser => "UPDATE_USER",
            Permission::DeleteUser => "DELETE_USER",
            Permission::ViewRoles => "VIEW_ROLES",
            Permission::ViewRoleById => "VIEW_ROLE_BY_ID",
            Permission::UpdateRole => "UPDATE_ROLE",
            Permission::DeleteRole => "DELETE_ROLE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an identifier that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown permission: {}", self.0)
    }
}

impl std::error::Error for UnknownPermission {}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}
