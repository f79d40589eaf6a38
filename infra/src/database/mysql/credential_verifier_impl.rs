//! MySQL implementation of the CredentialVerifier trait.
//!
//! Password hashes live in `user_credentials`, bcrypt-encoded. The bcrypt
//! comparison runs on the blocking pool; it costs hundreds of milliseconds
//! at the configured work factor.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use hg_core::errors::{DomainError, DomainResult};
use hg_core::repositories::CredentialVerifier;

/// MySQL implementation of CredentialVerifier
pub struct MySqlCredentialVerifier {
    pool: MySqlPool,
}

impl MySqlCredentialVerifier {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialVerifier for MySqlCredentialVerifier {
    async fn verify(&self, user_id: i64, password: &str) -> DomainResult<bool> {
        let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ? LIMIT 1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load credential: {}", e),
            })?;

        // no credential on file reads the same as a wrong password
        let stored: String = match row {
            Some(row) => row.try_get("password_hash").map_err(|e| DomainError::Internal {
                message: format!("Failed to get password_hash: {}", e),
            })?,
            None => return Ok(false),
        };

        let password = password.to_string();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &stored))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password check task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Password check failed: {}", e),
            })?;

        Ok(matched)
    }
}
