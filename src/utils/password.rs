use anyhow::anyhow;
use bcrypt::{hash, verify};

use rolegate_core::AppError;

pub use bcrypt::DEFAULT_COST;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify password: {}", e)))
}

/// Checks `password` on the blocking pool. Without a stored hash the same
/// bcrypt work is spent hashing the candidate and `false` is returned, so an
/// unknown account takes as long to reject as a wrong password.
pub async fn check_password(
    password: String,
    stored_hash: Option<String>,
    cost: u32,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(stored_hash) => verify_password(&password, &stored_hash),
        None => hash_password(&password, cost).map(|_| false),
    })
    .await
    .map_err(|e| AppError::internal(anyhow!("Password check task failed: {}", e)))?
}
