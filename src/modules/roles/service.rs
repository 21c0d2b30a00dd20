use anyhow::anyhow;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use rolegate_core::AppError;

use crate::modules::directory::{Store, Tables, dedup, ordered};

use super::model::{CreateRoleDto, Role, UpdateRoleDto};

fn ensure_permissions_exist(tables: &Tables, permission_ids: &[Uuid]) -> Result<(), AppError> {
    match permission_ids
        .iter()
        .find(|id| !tables.permissions.contains_key(id))
    {
        Some(missing) => Err(AppError::bad_request(anyhow!(
            "Permission not found: {}",
            missing
        ))),
        None => Ok(()),
    }
}

fn ensure_name_free(tables: &Tables, name: &str, except: Option<Uuid>) -> Result<(), AppError> {
    match tables.role_by_name(name) {
        Some(role) if Some(role.id) != except => Err(AppError::conflict(anyhow!(
            "Role with this name already exists"
        ))),
        _ => Ok(()),
    }
}

#[instrument(skip(db))]
pub async fn list_roles(db: &Store) -> Vec<Role> {
    let tables = db.read().await;
    ordered(tables.roles.values().cloned(), |role| (role.created_at, role.id))
}

#[instrument(skip(db))]
pub async fn get_role(db: &Store, id: Uuid) -> Result<Role, AppError> {
    db.read()
        .await
        .roles
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))
}

#[instrument(skip(db, dto), fields(name = %dto.name))]
pub async fn create_role(db: &Store, dto: CreateRoleDto) -> Result<Role, AppError> {
    let mut tables = db.write().await;

    let name = dto.name.trim().to_string();
    ensure_name_free(&tables, &name, None)?;
    ensure_permissions_exist(&tables, &dto.permission_ids)?;

    let now = Utc::now();
    let role = Role {
        id: Uuid::new_v4(),
        name,
        description: dto.description,
        permission_ids: dedup(dto.permission_ids),
        created_at: now,
        updated_at: now,
    };
    tables.roles.insert(role.id, role.clone());

    Ok(role)
}

#[instrument(skip(db, dto), fields(id = %dto.id))]
pub async fn update_role(db: &Store, dto: UpdateRoleDto) -> Result<Role, AppError> {
    let mut tables = db.write().await;

    if !tables.roles.contains_key(&dto.id) {
        return Err(AppError::not_found(anyhow!("Role not found")));
    }

    let name = dto.name.as_deref().map(|name| name.trim().to_string());
    if let Some(name) = &name {
        ensure_name_free(&tables, name, Some(dto.id))?;
    }
    if let Some(permission_ids) = &dto.permission_ids {
        ensure_permissions_exist(&tables, permission_ids)?;
    }

    let role = tables
        .roles
        .get_mut(&dto.id)
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;

    if let Some(name) = name {
        role.name = name;
    }
    if let Some(description) = dto.description {
        role.description = Some(description);
    }
    if let Some(permission_ids) = dto.permission_ids {
        role.permission_ids = dedup(permission_ids);
    }
    role.updated_at = Utc::now();

    Ok(role.clone())
}

/// Removes the role and detaches it from every user holding it.
#[instrument(skip(db))]
pub async fn delete_role(db: &Store, id: Uuid) -> Result<(), AppError> {
    let mut tables = db.write().await;

    if tables.roles.remove(&id).is_none() {
        return Err(AppError::not_found(anyhow!("Role not found")));
    }

    for record in tables.users.values_mut() {
        record.user.role_ids.retain(|role_id| *role_id != id);
    }

    Ok(())
}
