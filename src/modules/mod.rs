//! Feature modules served by the in-memory [`Directory`].
//!
//! Each module follows the same layout:
//!
//! - `model.rs`: entities and request DTOs with their schemas
//! - `service.rs`: business logic over the shared [`directory::Store`]
//! - `controller.rs`: turns a request context into a service call and a response

pub mod auth;
pub mod directory;
pub mod permissions;
pub mod roles;
pub mod users;

pub use self::directory::Directory;
