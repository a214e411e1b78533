//! bcrypt password hashing, run off the async executor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("hashing task failed: {0}")]
    Task(String),
}

pub async fn hash_password(plain: &str, cost: u32) -> Result<String, PasswordError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    let plain = plain.to_owned();
    let hash = hash.to_owned();
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?;

    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash could not be parsed");
            Ok(false)
        }
    }
}
