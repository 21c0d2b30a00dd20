//! # Rolegate Config
//!
//! Configuration types for the rolegate API, each loaded from environment
//! variables with development defaults:
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`cors`]: allowed browser origins
//! - [`server`]: listen address, body limit, metrics switch, log directory
//! - [`seed`]: optional bootstrap administrator
//!
//! # Example
//!
//! ```ignore
//! use rolegate_config::{CorsConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod seed;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use seed::SeedConfig;
pub use server::ServerConfig;
