use std::fmt;

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::permissions::Permission;

/// Where in request processing an error was produced.
///
/// Everything except [`ErrorKind::HandlerError`] is raised by the routing and
/// guard layer and never reaches a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RouteNotFound,
    Unauthenticated,
    Unauthorized,
    SchemaValidationFailed,
    HandlerError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::RouteNotFound => "route_not_found",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::SchemaValidationFailed => "schema_validation_failed",
            ErrorKind::HandlerError => "handler_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Required,
    Type,
    Format,
}

/// One field of a request input that broke one constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: Constraint,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint,
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, Constraint::Required, format!("{} is required", field))
    }

    pub fn wrong_type(field: &str, expected: &str) -> Self {
        Self::new(
            field,
            Constraint::Type,
            format!("{} must be {}", field, expected),
        )
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub error: Error,
    pub violations: Vec<FieldViolation>,
}

impl AppError {
    /// A handler-originated error with an explicit status.
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind: ErrorKind::HandlerError,
            status,
            error: err.into(),
            violations: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// Attaches field detail to a handler-originated error.
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.violations = violations;
        self
    }

    pub fn route_not_found(method: &str, path: &str) -> Self {
        Self {
            kind: ErrorKind::RouteNotFound,
            status: StatusCode::NOT_FOUND,
            error: anyhow!("No route for {} {}", method, path),
            violations: Vec::new(),
        }
    }

    pub fn unauthenticated(reason: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Unauthenticated,
            status: StatusCode::UNAUTHORIZED,
            error: anyhow!("{}", reason),
            violations: Vec::new(),
        }
    }

    /// The message names only the permission, never the resource, so a denied
    /// caller learns nothing about whether the target exists.
    pub fn unauthorized(permission: Permission) -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            status: StatusCode::FORBIDDEN,
            error: anyhow!("Access denied. Missing required permission: {}", permission),
            violations: Vec::new(),
        }
    }

    /// Shape violations (missing field, wrong type, unreadable body) answer
    /// 400; failures that are purely field constraints answer 422.
    pub fn schema_failed(violations: Vec<FieldViolation>) -> Self {
        let status = if violations
            .iter()
            .all(|violation| violation.constraint == Constraint::Format)
        {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_REQUEST
        };
        let message = violations
            .iter()
            .map(|violation| violation.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            kind: ErrorKind::SchemaValidationFailed,
            status,
            error: anyhow!("{}", message),
            violations,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = if self.violations.is_empty() {
            json!({
                "error": self.error.to_string(),
                "kind": self.kind,
            })
        } else {
            json!({
                "error": self.error.to_string(),
                "kind": self.kind,
                "details": self.violations,
            })
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
