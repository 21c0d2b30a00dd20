//! Request schema validation.
//!
//! A schema is a typed DTO implementing [`RequestSchema`]: it names the part
//! of the request it reads ([`InputSource`]), declares the shape of its
//! fields, and derives [`validator::Validate`] for format constraints.
//!
//! Validation runs in two passes. The shape pass walks the raw JSON candidate
//! and reports every missing required field, wrong JSON type and malformed
//! UUID. Only a candidate with a clean shape is deserialized into the DTO,
//! whose `Validate` rules then report format violations (email, length).
//!
//! [`Schema`] enumerates the schemas a route can declare as a guard step.

use std::collections::HashMap;

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use rolegate_core::{AppError, Constraint, FieldViolation};

use crate::modules::auth::model::{ForgetPasswordDto, LoginDto, RegisterDto};
use crate::modules::roles::model::UpdateRoleDto;
use crate::modules::users::model::{CreateUserDto, UpdateUserDto};

/// Which part of the request a schema validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Params,
    Query,
    Body,
    /// Body object with the path parameters merged over it.
    ParamsAndBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Uuid,
    UuidList,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldType,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

pub trait RequestSchema: DeserializeOwned + Validate {
    const SOURCE: InputSource;
    const FIELDS: &'static [Field];
}

/// Everything a schema may read from one request. The body is kept as raw
/// bytes and only parsed as JSON when a schema reads it.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl RequestInput {
    pub fn with_json(body: &Value) -> Self {
        Self {
            body: Bytes::from(body.to_string()),
            ..Self::default()
        }
    }

    /// Parses the body. An empty or all-whitespace body is `Null`.
    pub fn json(&self) -> Result<Value, Vec<FieldViolation>> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&self.body)
            .map_err(|_| vec![FieldViolation::wrong_type("body", "valid JSON")])
    }

    /// Builds the JSON object a schema with `source` validates. A missing
    /// body counts as an empty object.
    pub fn candidate(&self, source: InputSource) -> Result<Value, Vec<FieldViolation>> {
        let object = match source {
            InputSource::Params => string_map(&self.params),
            InputSource::Query => string_map(&self.query),
            InputSource::Body => self.body_object()?,
            InputSource::ParamsAndBody => {
                let mut object = self.body_object()?;
                object.extend(string_map(&self.params));
                object
            }
        };

        Ok(Value::Object(object))
    }

    fn body_object(&self) -> Result<Map<String, Value>, Vec<FieldViolation>> {
        match self.json()? {
            Value::Null => Ok(Map::new()),
            Value::Object(object) => Ok(object),
            _ => Err(vec![FieldViolation::wrong_type("body", "a JSON object")]),
        }
    }
}

fn string_map(values: &HashMap<String, String>) -> Map<String, Value> {
    values
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}

/// Validates `input` against `T` and returns the parsed DTO.
pub fn check<T: RequestSchema>(input: &RequestInput) -> Result<T, Vec<FieldViolation>> {
    let candidate = input.candidate(T::SOURCE)?;

    let violations = check_shape(&candidate, T::FIELDS);
    if !violations.is_empty() {
        return Err(violations);
    }

    let value: T = serde_json::from_value(candidate).map_err(|e| {
        vec![FieldViolation::new(
            "body",
            Constraint::Type,
            format!("Invalid request input: {}", e),
        )]
    })?;

    value.validate().map_err(|errors| format_errors(&errors))?;

    Ok(value)
}

fn check_shape(candidate: &Value, fields: &[Field]) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    for field in fields {
        match candidate.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    violations.push(FieldViolation::required(field.name));
                }
            }
            Some(value) => check_value(field.name, field.kind, value, &mut violations),
        }
    }

    violations
}

fn check_value(name: &str, kind: FieldType, value: &Value, violations: &mut Vec<FieldViolation>) {
    match kind {
        FieldType::String => {
            if !value.is_string() {
                violations.push(FieldViolation::wrong_type(name, "a string"));
            }
        }
        FieldType::Uuid => match value.as_str() {
            Some(raw) if Uuid::parse_str(raw).is_ok() => {}
            Some(_) => violations.push(FieldViolation::new(
                name,
                Constraint::Format,
                format!("{} must be a valid UUID", name),
            )),
            None => violations.push(FieldViolation::wrong_type(name, "a UUID string")),
        },
        FieldType::UuidList => match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    check_value(&format!("{}[{}]", name, index), FieldType::Uuid, item, violations);
                }
            }
            None => violations.push(FieldViolation::wrong_type(name, "an array of UUIDs")),
        },
    }
}

fn format_errors(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                FieldViolation::new(field.to_string(), Constraint::Format, message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

/// Path parameter schema shared by the by-id routes.
#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct ResourceId {
    pub id: Uuid,
}

impl RequestSchema for ResourceId {
    const SOURCE: InputSource = InputSource::Params;
    const FIELDS: &'static [Field] = &[Field::required("id", FieldType::Uuid)];
}

/// The schemas a route can declare as a guard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    GetUserById,
    Register,
    Login,
    ForgetPassword,
    CreateUser,
    UpdateUser,
    DeleteUser,
    GetRoleById,
    UpdateRole,
    DeleteRole,
}

impl Schema {
    pub fn name(self) -> &'static str {
        match self {
            Schema::GetUserById => "GetUserById",
            Schema::Register => "Register",
            Schema::Login => "Login",
            Schema::ForgetPassword => "ForgetPassword",
            Schema::CreateUser => "CreateUser",
            Schema::UpdateUser => "UpdateUser",
            Schema::DeleteUser => "DeleteUser",
            Schema::GetRoleById => "GetRoleById",
            Schema::UpdateRole => "UpdateRole",
            Schema::DeleteRole => "DeleteRole",
        }
    }

    pub fn check(self, input: &RequestInput) -> Result<(), AppError> {
        let result = match self {
            Schema::GetUserById | Schema::DeleteUser | Schema::GetRoleById | Schema::DeleteRole => {
                check::<ResourceId>(input).map(drop)
            }
            Schema::Register => check::<RegisterDto>(input).map(drop),
            Schema::Login => check::<LoginDto>(input).map(drop),
            Schema::ForgetPassword => check::<ForgetPasswordDto>(input).map(drop),
            Schema::CreateUser => check::<CreateUserDto>(input).map(drop),
            Schema::UpdateUser => check::<UpdateUserDto>(input).map(drop),
            Schema::UpdateRole => check::<UpdateRoleDto>(input).map(drop),
        };

        result.map_err(AppError::schema_failed)
    }
}
