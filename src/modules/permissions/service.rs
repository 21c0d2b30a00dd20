use anyhow::anyhow;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use rolegate_core::{AppError, Constraint, FieldViolation, Permission};

use crate::modules::directory::{Store, Tables, ordered};

use super::model::{CreatePermissionDto, PermissionRecord, UpdatePermissionDto};

/// Stored permission names must be registry identifiers.
fn parse_name(raw: &str) -> Result<Permission, AppError> {
    raw.trim().parse::<Permission>().map_err(|e| {
        AppError::bad_request(anyhow!("{}", e)).with_violations(vec![FieldViolation::new(
            "name",
            Constraint::Format,
            e.to_string(),
        )])
    })
}

fn ensure_name_free(tables: &Tables, name: Permission, except: Option<Uuid>) -> Result<(), AppError> {
    match tables.permission_by_name(name) {
        Some(record) if Some(record.id) != except => Err(AppError::conflict(anyhow!(
            "Permission {} already exists",
            name
        ))),
        _ => Ok(()),
    }
}

#[instrument(skip(db))]
pub async fn list_permissions(db: &Store) -> Vec<PermissionRecord> {
    let tables = db.read().await;
    ordered(tables.permissions.values().cloned(), |record| {
        (record.created_at, record.id)
    })
}

#[instrument(skip(db))]
pub async fn get_permission(db: &Store, id: Uuid) -> Result<PermissionRecord, AppError> {
    db.read()
        .await
        .permissions
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::not_found(anyhow!("Permission not found")))
}

#[instrument(skip(db, dto), fields(name = %dto.name))]
pub async fn create_permission(
    db: &Store,
    dto: CreatePermissionDto,
) -> Result<PermissionRecord, AppError> {
    let name = parse_name(&dto.name)?;
    let mut tables = db.write().await;
    ensure_name_free(&tables, name, None)?;

    let now = Utc::now();
    let record = PermissionRecord {
        id: Uuid::new_v4(),
        name,
        description: dto.description,
        created_at: now,
        updated_at: now,
    };
    tables.permissions.insert(record.id, record.clone());

    Ok(record)
}

#[instrument(skip(db, dto), fields(id = %dto.id))]
pub async fn update_permission(
    db: &Store,
    dto: UpdatePermissionDto,
) -> Result<PermissionRecord, AppError> {
    let name = dto.name.as_deref().map(parse_name).transpose()?;
    let mut tables = db.write().await;

    if !tables.permissions.contains_key(&dto.id) {
        return Err(AppError::not_found(anyhow!("Permission not found")));
    }
    if let Some(name) = name {
        ensure_name_free(&tables, name, Some(dto.id))?;
    }

    let record = tables
        .permissions
        .get_mut(&dto.id)
        .ok_or_else(|| AppError::not_found(anyhow!("Permission not found")))?;

    if let Some(name) = name {
        record.name = name;
    }
    if let Some(description) = dto.description {
        record.description = Some(description);
    }
    record.updated_at = Utc::now();

    Ok(record.clone())
}

/// Removes the record and detaches it from every role holding it.
#[instrument(skip(db))]
pub async fn delete_permission(db: &Store, id: Uuid) -> Result<(), AppError> {
    let mut tables = db.write().await;

    if tables.permissions.remove(&id).is_none() {
        return Err(AppError::not_found(anyhow!("Permission not found")));
    }

    for role in tables.roles.values_mut() {
        role.permission_ids.retain(|permission_id| *permission_id != id);
    }

    Ok(())
}
