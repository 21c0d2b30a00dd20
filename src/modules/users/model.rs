//! User entities and request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validator::{Field, FieldType, InputSource, RequestSchema};

/// A user as returned by the API. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100, message = "first_name must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Role IDs to assign to the user. If empty, no roles are assigned.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

impl RequestSchema for CreateUserDto {
    const SOURCE: InputSource = InputSource::Body;
    const FIELDS: &'static [Field] = &[
        Field::required("first_name", FieldType::String),
        Field::required("last_name", FieldType::String),
        Field::required("email", FieldType::String),
        Field::required("password", FieldType::String),
        Field::optional("role_ids", FieldType::UuidList),
    ];
}

/// Partial update; absent fields are left unchanged. `role_ids`, when
/// present, replaces the user's role set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserDto {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100, message = "first_name must be between 1 and 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "last_name must be between 1 and 100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    pub role_ids: Option<Vec<Uuid>>,
}

impl RequestSchema for UpdateUserDto {
    const SOURCE: InputSource = InputSource::ParamsAndBody;
    const FIELDS: &'static [Field] = &[
        Field::required("id", FieldType::Uuid),
        Field::optional("first_name", FieldType::String),
        Field::optional("last_name", FieldType::String),
        Field::optional("email", FieldType::String),
        Field::optional("role_ids", FieldType::UuidList),
    ];
}
