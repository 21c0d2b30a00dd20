use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validator::{Field, FieldType, InputSource, RequestSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permission_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub permission_ids: Vec<Uuid>,
}

impl RequestSchema for CreateRoleDto {
    const SOURCE: InputSource = InputSource::Body;
    const FIELDS: &'static [Field] = &[
        Field::required("name", FieldType::String),
        Field::optional("description", FieldType::String),
        Field::optional("permission_ids", FieldType::UuidList),
    ];
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoleDto {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    pub permission_ids: Option<Vec<Uuid>>,
}

impl RequestSchema for UpdateRoleDto {
    const SOURCE: InputSource = InputSource::ParamsAndBody;
    const FIELDS: &'static [Field] = &[
        Field::required("id", FieldType::Uuid),
        Field::optional("name", FieldType::String),
        Field::optional("description", FieldType::String),
        Field::optional("permission_ids", FieldType::UuidList),
    ];
}
