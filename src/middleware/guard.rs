//! Per-route guard chain.
//!
//! Each route carries an ordered list of [`GuardStep`]s fixed when the route
//! table is built. [`run_guards`] is installed as a `route_layer` on that
//! route only, so two verbs on the same path never share guards.
//!
//! Steps run strictly in order and the first failure rejects the request:
//! later steps and the handler never run. The request body is buffered at
//! most once, by the first schema step, and handed on unchanged.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use rolegate_core::{AppError, Permission};

use crate::context::read_input;
use crate::metrics::track_guard_rejection;
use crate::middleware::auth::{Decision, authenticate};
use crate::state::AppState;
use crate::validator::{RequestInput, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStep {
    Authorize(Permission),
    Validate(Schema),
}

impl fmt::Display for GuardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardStep::Authorize(permission) => write!(f, "Auth({})", permission),
            GuardStep::Validate(schema) => write!(f, "Schema({})", schema.name()),
        }
    }
}

/// Lifecycle of one request. `Responded` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Dispatched,
    Authorizing,
    Validating,
    Handling,
    Responded,
    Rejected,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPhase::Dispatched => "dispatched",
            RequestPhase::Authorizing => "authorizing",
            RequestPhase::Validating => "validating",
            RequestPhase::Handling => "handling",
            RequestPhase::Responded => "responded",
            RequestPhase::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// A guard failure and the phase the chain was in when it failed.
#[derive(Debug)]
pub struct Rejection {
    pub phase: RequestPhase,
    pub error: AppError,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        self.error.into_response()
    }
}

#[derive(Clone)]
pub struct GuardChain {
    state: AppState,
    route: Arc<str>,
    steps: Arc<[GuardStep]>,
}

impl GuardChain {
    pub fn new(state: AppState, route: impl Into<Arc<str>>, steps: Arc<[GuardStep]>) -> Self {
        Self {
            state,
            route: route.into(),
            steps,
        }
    }

    pub fn steps(&self) -> &[GuardStep] {
        &self.steps
    }

    /// Runs every step against `req`. On success returns the request with the
    /// principal attached and the body intact.
    pub async fn evaluate(&self, req: Request) -> Result<Request, Rejection> {
        let (mut parts, mut body) = req.into_parts();
        let mut input: Option<RequestInput> = None;

        for step in self.steps.iter() {
            match *step {
                GuardStep::Authorize(permission) => {
                    let phase = RequestPhase::Authorizing;
                    debug!(route = %self.route, %phase, %permission, "Checking permission");

                    let principal = authenticate(&parts.headers, &self.state.jwt_config)
                        .map_err(|error| Rejection { phase, error })?;

                    match self.state.gate.check(&principal, permission).await {
                        Decision::Allow => {
                            parts.extensions.insert(principal);
                        }
                        Decision::Deny => {
                            return Err(Rejection {
                                phase,
                                error: AppError::unauthorized(permission),
                            });
                        }
                    }
                }
                GuardStep::Validate(schema) => {
                    let phase = RequestPhase::Validating;
                    debug!(route = %self.route, %phase, schema = schema.name(), "Validating input");

                    let loaded = match input.take() {
                        Some(loaded) => loaded,
                        None => {
                            let (loaded, bytes) = read_input(
                                &mut parts,
                                std::mem::take(&mut body),
                                self.state.body_limit,
                            )
                            .await
                            .map_err(|violations| Rejection {
                                phase,
                                error: AppError::schema_failed(violations),
                            })?;
                            body = Body::from(bytes);
                            loaded
                        }
                    };

                    schema
                        .check(&loaded)
                        .map_err(|error| Rejection { phase, error })?;
                    input = Some(loaded);
                }
            }
        }

        Ok(Request::from_parts(parts, body))
    }
}

pub async fn run_guards(State(chain): State<GuardChain>, req: Request, next: Next) -> Response {
    debug!(
        route = %chain.route,
        phase = %RequestPhase::Dispatched,
        guards = chain.steps.len(),
        "Request dispatched"
    );

    match chain.evaluate(req).await {
        Ok(req) => next.run(req).await,
        Err(rejection) => {
            warn!(
                route = %chain.route,
                phase = %rejection.phase,
                kind = %rejection.error.kind,
                error = %rejection.error.error,
                "Request rejected by guard"
            );
            track_guard_rejection(rejection.error.kind);
            debug!(route = %chain.route, phase = %RequestPhase::Rejected, "Request finished");
            rejection.into_response()
        }
    }
}
