//! # Rolegate Core
//!
//! Core types shared by every rolegate crate:
//!
//! - [`errors`]: the request error taxonomy and its HTTP response conversion
//! - [`permissions`]: the closed permission registry
//!
//! # Example
//!
//! ```ignore
//! use rolegate_core::{AppError, Permission};
//!
//! let error = AppError::unauthorized(Permission::ViewUsers);
//! assert_eq!(error.status.as_u16(), 403);
//! ```

pub mod errors;
pub mod permissions;

// Re-export commonly used types at crate root
pub use errors::{AppError, Constraint, ErrorKind, FieldViolation};
pub use permissions::{Permission, UnknownPermission};
