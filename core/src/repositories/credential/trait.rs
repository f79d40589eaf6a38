//! Credential verifier trait, the password check behind login.

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Compares a presented password against the stored credential.
///
/// `Ok(false)` covers both "wrong password" and "no credential on file" so
/// the caller cannot distinguish the two.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, user_id: i64, password: &str) -> DomainResult<bool>;
}
