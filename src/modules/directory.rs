//! In-memory implementation of [`Handlers`].
//!
//! All tables sit behind one `tokio::sync::RwLock`, so every service call
//! sees a consistent snapshot and writes never interleave.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use rolegate_config::{JwtConfig, SeedConfig};
use rolegate_core::{AppError, Permission};

use crate::context::RequestContext;
use crate::handler::{Handlers, Operation};
use crate::utils::password::DEFAULT_COST;

use super::auth::controller as auth;
use super::permissions::controller as permissions;
use super::permissions::model::PermissionRecord;
use super::roles::controller as roles;
use super::roles::model::Role;
use super::users::controller as users;
use super::users::model::{User, UserRecord};

pub const ADMINISTRATOR_ROLE: &str = "administrator";

#[derive(Debug, Default)]
pub struct Tables {
    pub users: HashMap<Uuid, UserRecord>,
    pub roles: HashMap<Uuid, Role>,
    pub permissions: HashMap<Uuid, PermissionRecord>,
}

impl Tables {
    pub fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|record| record.user.email.eq_ignore_ascii_case(email))
    }

    pub fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles
            .values()
            .find(|role| role.name.eq_ignore_ascii_case(name))
    }

    pub fn permission_by_name(&self, name: Permission) -> Option<&PermissionRecord> {
        self.permissions.values().find(|record| record.name == name)
    }

    /// Union of the registry identifiers granted by `role_ids`, sorted.
    pub fn granted_permissions(&self, role_ids: &[Uuid]) -> Vec<Permission> {
        let mut granted: Vec<Permission> = role_ids
            .iter()
            .filter_map(|id| self.roles.get(id))
            .flat_map(|role| role.permission_ids.iter())
            .filter_map(|id| self.permissions.get(id))
            .map(|record| record.name)
            .collect();
        granted.sort();
        granted.dedup();
        granted
    }
}

pub type Store = RwLock<Tables>;

/// Rows ordered by creation time, ties broken by id.
pub fn ordered<T>(
    rows: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (DateTime<Utc>, Uuid),
) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(key);
    rows
}

/// Drops repeated ids, keeping first occurrence order.
pub fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

pub struct Directory {
    pub(crate) store: Store,
    pub(crate) jwt_config: JwtConfig,
    pub(crate) hash_cost: u32,
}

impl Directory {
    pub fn new(jwt_config: JwtConfig) -> Self {
        Self {
            store: RwLock::new(Tables::default()),
            jwt_config,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Lower bcrypt cost, for tests and local tooling.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Creates one permission record per registry entry, an administrator
    /// role holding all of them, and the admin user. Existing rows are reused,
    /// so seeding twice changes nothing.
    #[instrument(skip(self, seed), fields(email = %seed.admin_email))]
    pub async fn seed_admin(&self, seed: &SeedConfig) -> Result<User, AppError> {
        let password_hash =
            crate::utils::password::hash_password(&seed.admin_password, self.hash_cost)?;
        let now = Utc::now();
        let mut tables = self.store.write().await;

        let mut permission_ids = Vec::with_capacity(Permission::ALL.len());
        for permission in Permission::ALL {
            let id = match tables.permission_by_name(permission) {
                Some(record) => record.id,
                None => {
                    let record = PermissionRecord {
                        id: Uuid::new_v4(),
                        name: permission,
                        description: Some(format!("Grants {}", permission)),
                        created_at: now,
                        updated_at: now,
                    };
                    let id = record.id;
                    tables.permissions.insert(id, record);
                    id
                }
            };
            permission_ids.push(id);
        }

        let role_id = match tables.role_by_name(ADMINISTRATOR_ROLE).map(|role| role.id) {
            Some(id) => {
                if let Some(role) = tables.roles.get_mut(&id) {
                    for permission_id in &permission_ids {
                        if !role.permission_ids.contains(permission_id) {
                            role.permission_ids.push(*permission_id);
                        }
                    }
                }
                id
            }
            None => {
                let role = Role {
                    id: Uuid::new_v4(),
                    name: ADMINISTRATOR_ROLE.to_string(),
                    description: Some("Holds every permission".to_string()),
                    permission_ids,
                    created_at: now,
                    updated_at: now,
                };
                let id = role.id;
                tables.roles.insert(id, role);
                id
            }
        };

        let existing = tables
            .user_by_email(&seed.admin_email)
            .map(|record| record.user.id);

        let user = match existing.and_then(|id| tables.users.get_mut(&id)) {
            Some(record) => {
                if !record.user.role_ids.contains(&role_id) {
                    record.user.updated_at = now;
                    record.user.role_ids.push(role_id);
                }
                record.user.clone()
            }
            None => {
                let user = User {
                    id: Uuid::new_v4(),
                    first_name: "System".to_string(),
                    last_name: "Administrator".to_string(),
                    email: seed.admin_email.to_lowercase(),
                    role_ids: vec![role_id],
                    created_at: now,
                    updated_at: now,
                };
                tables.users.insert(
                    user.id,
                    UserRecord {
                        user: user.clone(),
                        password_hash,
                    },
                );
                user
            }
        };

        info!(user_id = %user.id, "Administrator seeded");
        Ok(user)
    }
}

#[async_trait]
impl Handlers for Directory {
    async fn handle(
        &self,
        operation: Operation,
        ctx: RequestContext,
    ) -> Result<Response, AppError> {
        match operation {
            Operation::ListUsers => users::list_users(self, ctx).await,
            Operation::GetUser => users::get_user(self, ctx).await,
            Operation::CreateUser => users::create_user(self, ctx).await,
            Operation::UpdateUser => users::update_user(self, ctx).await,
            Operation::DeleteUser => users::delete_user(self, ctx).await,
            Operation::Register => auth::register(self, ctx).await,
            Operation::Login => auth::login(self, ctx).await,
            Operation::ForgetPassword => auth::forget_password(self, ctx).await,
            Operation::ListRoles => roles::list_roles(self, ctx).await,
            Operation::GetRole => roles::get_role(self, ctx).await,
            Operation::CreateRole => roles::create_role(self, ctx).await,
            Operation::UpdateRole => roles::update_role(self, ctx).await,
            Operation::DeleteRole => roles::delete_role(self, ctx).await,
            Operation::ListPermissions => permissions::list_permissions(self, ctx).await,
            Operation::GetPermission => permissions::get_permission(self, ctx).await,
            Operation::CreatePermission => permissions::create_permission(self, ctx).await,
            Operation::UpdatePermission => permissions::update_permission(self, ctx).await,
            Operation::DeletePermission => permissions::delete_permission(self, ctx).await,
        }
    }
}
