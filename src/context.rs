use std::collections::HashMap;

use anyhow::anyhow;
use axum::{
    body::{Body, Bytes},
    extract::{FromRequestParts, Query, RawPathParams, Request},
    http::{Method, request::Parts},
};

use rolegate_auth::Principal;
use rolegate_core::{AppError, FieldViolation};

use crate::middleware::auth::authenticate;
use crate::state::AppState;
use crate::validator::{self, RequestInput, RequestSchema};

/// What a handler sees of one request: the method, matched path, path and
/// query parameters, raw body, and the caller when one was authenticated.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub input: RequestInput,
    pub principal: Option<Principal>,
}

impl RequestContext {
    /// Routes without an authorization guard still see the caller when a
    /// valid bearer token is sent; an invalid one is ignored here.
    pub async fn from_request(req: Request, state: &AppState) -> Result<Self, AppError> {
        let (mut parts, body) = req.into_parts();

        let (input, _) = read_input(&mut parts, body, state.body_limit)
            .await
            .map_err(|violations| {
                AppError::bad_request(anyhow!("Invalid request body")).with_violations(violations)
            })?;

        let principal = match parts.extensions.remove::<Principal>() {
            Some(principal) => Some(principal),
            None => authenticate(&parts.headers, &state.jwt_config).ok(),
        };

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            input,
            principal,
        })
    }

    /// Validates the input against `T` inside a handler. Failures are handler
    /// errors (400) since no guard declared the schema.
    pub fn parse<T: RequestSchema>(&self) -> Result<T, AppError> {
        validator::check::<T>(&self.input).map_err(|violations| {
            let message = violations
                .iter()
                .map(|violation| violation.message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            AppError::bad_request(anyhow!("{}", message)).with_violations(violations)
        })
    }
}

/// Reads path params, query and the raw body of a request. The body is not
/// parsed here; schemas that read it do so. Returns the buffered bytes so the
/// caller can rebuild the request unchanged.
pub async fn read_input(
    parts: &mut Parts,
    body: Body,
    limit: usize,
) -> Result<(RequestInput, Bytes), Vec<FieldViolation>> {
    let params = RawPathParams::from_request_parts(parts, &())
        .await
        .map(|raw| {
            raw.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>()
        })
        .unwrap_or_default();

    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(query)| query)
        .map_err(|_| vec![FieldViolation::wrong_type("query", "a valid query string")])?;

    let bytes = axum::body::to_bytes(body, limit).await.map_err(|_| {
        vec![FieldViolation::new(
            "body",
            rolegate_core::Constraint::Format,
            format!("body must not exceed {} bytes", limit),
        )]
    })?;

    Ok((
        RequestInput {
            params,
            query,
            body: bytes.clone(),
        },
        bytes,
    ))
}
