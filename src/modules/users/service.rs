use anyhow::anyhow;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use rolegate_core::AppError;

use crate::modules::directory::{Store, Tables, dedup, ordered};
use crate::utils::password::hash_password;

use super::model::{CreateUserDto, UpdateUserDto, User, UserRecord};

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn ensure_roles_exist(tables: &Tables, role_ids: &[Uuid]) -> Result<(), AppError> {
    match role_ids.iter().find(|id| !tables.roles.contains_key(id)) {
        Some(missing) => Err(AppError::bad_request(anyhow!("Role not found: {}", missing))),
        None => Ok(()),
    }
}

#[instrument(skip(db))]
pub async fn list_users(db: &Store) -> Vec<User> {
    let tables = db.read().await;
    ordered(tables.users.values().map(|record| record.user.clone()), |user| {
        (user.created_at, user.id)
    })
}

#[instrument(skip(db))]
pub async fn get_user(db: &Store, id: Uuid) -> Result<User, AppError> {
    db.read()
        .await
        .users
        .get(&id)
        .map(|record| record.user.clone())
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
}

/// Inserts a user with an already hashed password. Shared by registration
/// and administrative creation.
pub(crate) fn insert_user(
    tables: &mut Tables,
    first_name: String,
    last_name: String,
    email: &str,
    password_hash: String,
    role_ids: Vec<Uuid>,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    if tables.user_by_email(&email).is_some() {
        return Err(AppError::conflict(anyhow!(
            "User with this email already exists"
        )));
    }
    ensure_roles_exist(tables, &role_ids)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        first_name,
        last_name,
        email,
        role_ids: dedup(role_ids),
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

    Ok(user)
}

#[instrument(skip(db, dto), fields(email = %dto.email))]
pub async fn create_user(db: &Store, dto: CreateUserDto, hash_cost: u32) -> Result<User, AppError> {
    let password_hash = hash_password(&dto.password, hash_cost)?;
    let mut tables = db.write().await;

    insert_user(
        &mut tables,
        dto.first_name,
        dto.last_name,
        &dto.email,
        password_hash,
        dto.role_ids,
    )
}

#[instrument(skip(db, dto), fields(id = %dto.id))]
pub async fn update_user(db: &Store, dto: UpdateUserDto) -> Result<User, AppError> {
    let mut tables = db.write().await;

    if !tables.users.contains_key(&dto.id) {
        return Err(AppError::not_found(anyhow!("User not found")));
    }

    let email = dto.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        if let Some(other) = tables.user_by_email(email) {
            if other.user.id != dto.id {
                return Err(AppError::conflict(anyhow!(
                    "User with this email already exists"
                )));
            }
        }
    }
    if let Some(role_ids) = &dto.role_ids {
        ensure_roles_exist(&tables, role_ids)?;
    }

    let record = tables
        .users
        .get_mut(&dto.id)
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;
    let user = &mut record.user;

    if let Some(first_name) = dto.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = dto.last_name {
        user.last_name = last_name;
    }
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(role_ids) = dto.role_ids {
        user.role_ids = dedup(role_ids);
    }
    user.updated_at = Utc::now();

    Ok(user.clone())
}

#[instrument(skip(db))]
pub async fn delete_user(db: &Store, id: Uuid) -> Result<(), AppError> {
    db.write()
        .await
        .users
        .remove(&id)
        .map(drop)
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
}
