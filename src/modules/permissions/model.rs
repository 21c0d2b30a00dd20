use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rolegate_core::Permission;

use crate::validator::{Field, FieldType, InputSource, RequestSchema};

/// A stored permission. `name` is always a registry identifier, so a role
/// holding this record grants exactly that capability at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: Uuid,
    pub name: Permission,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePermissionDto {
    pub name: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

impl RequestSchema for CreatePermissionDto {
    const SOURCE: InputSource = InputSource::Body;
    const FIELDS: &'static [Field] = &[
        Field::required("name", FieldType::String),
        Field::optional("description", FieldType::String),
    ];
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePermissionDto {
    pub id: Uuid,
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

impl RequestSchema for UpdatePermissionDto {
    const SOURCE: InputSource = InputSource::ParamsAndBody;
    const FIELDS: &'static [Field] = &[
        Field::required("id", FieldType::Uuid),
        Field::optional("name", FieldType::String),
        Field::optional("description", FieldType::String),
    ];
}
