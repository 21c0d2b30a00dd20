//! # Rolegate API
//!
//! An HTTP admin API for users, roles and permissions, built with axum.
//! Every route is declared once in a [`routes::RouteTable`] together with an
//! ordered list of guard steps; a request reaches its handler only after
//! every step has passed.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── rolegate-core/    # Permission registry, error taxonomy
//! ├── rolegate-config/  # Environment configuration
//! └── rolegate-auth/    # JWT claims, tokens, the request principal
//! src/
//! ├── middleware/       # Authentication, authorization gate, guard chain
//! ├── modules/          # In-memory directory: auth, users, roles, permissions
//! ├── routes.rs         # The route table
//! ├── router.rs         # Route table to axum router
//! ├── validator.rs      # Request schemas
//! └── utils/            # Password hashing
//! ```
//!
//! ## Request Lifecycle
//!
//! ```text
//! Dispatched -> Authorizing -> Validating -> Handling -> Responded
//!                    \              \
//!                     `--------------`--> Rejected
//! ```
//!
//! Failures are reported as one of five kinds: `route_not_found`,
//! `unauthenticated` (401), `unauthorized` (403), `schema_validation_failed`
//! (400 or 422) and `handler_error` (status chosen by the handler).
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! JWT_ACCESS_EXPIRY=3600
//! SERVER_PORT=3000
//! SEED_ADMIN_EMAIL=admin@example.com
//! SEED_ADMIN_PASSWORD=change-me
//! ```

pub mod context;
pub mod handler;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod routes;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use rolegate_auth;
pub use rolegate_config;
pub use rolegate_core;
