//! In-memory IdentityRepository for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::subject::AuthSubject;
use crate::errors::{DomainError, DomainResult};

use super::r#trait::IdentityRepository;

/// Mock identity repository backed by a HashMap keyed by user id.
pub struct MockIdentityRepository {
    subjects: Arc<RwLock<HashMap<i64, AuthSubject>>>,
}

impl MockIdentityRepository {
    pub fn new() -> Self {
        Self {
            subjects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed a subject, replacing any existing row with the same id
    pub async fn insert(&self, subject: AuthSubject) {
        let mut subjects = self.subjects.write().await;
        subjects.insert(subject.user_id, subject);
    }
}

impl Default for MockIdentityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRepository for MockIdentityRepository {
    async fn load_by_phone(&self, phone: &str) -> DomainResult<Option<AuthSubject>> {
        let subjects = self.subjects.read().await;
        Ok(subjects.values().find(|s| s.phone == phone).cloned())
    }

    async fn load_by_id(&self, user_id: i64) -> DomainResult<Option<AuthSubject>> {
        let subjects = self.subjects.read().await;
        Ok(subjects.get(&user_id).cloned())
    }

    async fn bump_token_version(&self, user_id: i64) -> DomainResult<i64> {
        let mut subjects = self.subjects.write().await;
        match subjects.get_mut(&user_id) {
            Some(subject) => {
                subject.token_version += 1;
                Ok(subject.token_version)
            }
            None => Err(DomainError::NotFound {
                resource: format!("user {}", user_id),
            }),
        }
    }
}
