//! In-memory CredentialVerifier for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainResult;

use super::r#trait::CredentialVerifier;

/// Mock verifier holding plaintext passwords keyed by user id.
pub struct MockCredentialVerifier {
    passwords: Arc<RwLock<HashMap<i64, String>>>,
}

impl MockCredentialVerifier {
    pub fn new() -> Self {
        Self {
            passwords: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn set_password(&self, user_id: i64, password: &str) {
        let mut passwords = self.passwords.write().await;
        passwords.insert(user_id, password.to_string());
    }
}

impl Default for MockCredentialVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialVerifier for MockCredentialVerifier {
    async fn verify(&self, user_id: i64, password: &str) -> DomainResult<bool> {
        let passwords = self.passwords.read().await;
        Ok(passwords
            .get(&user_id)
            .map(|stored| stored == password)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_matches_only_the_stored_password() {
        let verifier = MockCredentialVerifier::new();
        verifier.set_password(1, "s3cret").await;

        assert!(verifier.verify(1, "s3cret").await.unwrap());
        assert!(!verifier.verify(1, "wrong").await.unwrap());
        assert!(!verifier.verify(2, "s3cret").await.unwrap());
    }
}
