use bcrypt::DEFAULT_COST;

use crate::error::{QueueError, Result};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// bcrypt operates on at most 72 bytes.
pub const MAX_PASSWORD_LENGTH: usize = 72;

pub fn validate(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(QueueError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(QueueError::Validation(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hash a password with bcrypt on the blocking pool.
pub async fn hash(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, DEFAULT_COST).map_err(|e| QueueError::Store(e.to_string()))
    })
    .await
    .map_err(|e| QueueError::Store(format!("hashing task failed: {}", e)))?
}

/// Verify a password against a stored bcrypt hash on the blocking pool.
pub async fn verify(password: &str, hashed: &str) -> Result<bool> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hashed).map_err(|e| QueueError::Store(e.to_string()))
    })
    .await
    .map_err(|e| QueueError::Store(format!("verify task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_passwords() {
        assert!(validate("abc").is_err());
        assert!(validate("abcdef").is_ok());
    }

    #[test]
    fn rejects_oversized_passwords() {
        let long = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(validate(&long).is_err());
    }

    #[tokio::test]
    async fn hash_then_verify_round_trip() {
        let hashed = hash("correct horse").await.unwrap();
        assert!(verify("correct horse", &hashed).await.unwrap());
        assert!(!verify("wrong horse", &hashed).await.unwrap());
    }
}
