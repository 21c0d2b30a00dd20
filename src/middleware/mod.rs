//! Middleware for request processing.
//!
//! - [`auth`]: bearer token authentication and the authorization gate
//! - [`guard`]: the per-route guard chain run before a handler
//!
//! # Guard Flow
//!
//! 1. axum matches the request to a route by method and path
//! 2. The route's guard steps run in their declared order
//! 3. `Authorize(permission)` authenticates the caller from
//!    `Authorization: Bearer <token>` and asks the gate for a decision
//! 4. `Validate(schema)` checks params, query or body against the schema
//! 5. The handler runs only if every step passed
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::guard::GuardStep;
//! use crate::validator::Schema;
//! use rolegate_core::Permission;
//!
//! let guards = [
//!     GuardStep::Authorize(Permission::UpdateUser),
//!     GuardStep::Validate(Schema::UpdateUser),
//! ];
//! ```

pub mod auth;
pub mod guard;
