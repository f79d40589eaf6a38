//! In-memory SessionRepository for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::session::{Session, SessionStatus};
use crate::errors::{DomainError, DomainResult};

use super::r#trait::SessionRepository;

/// Mock session repository backed by a HashMap keyed by session id.
///
/// The write lock doubles as the critical section for `create_bounded`,
/// mirroring the per-user transaction of the MySQL implementation.
pub struct MockSessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MockSessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Snapshot of every stored row, test assertions only
    pub async fn all(&self) -> Vec<Session> {
        let sessions = self.sessions.read().await;
        sessions.values().cloned().collect()
    }
}

impl Default for MockSessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn oldest_of(sessions: &HashMap<String, Session>, user_id: i64) -> Option<Session> {
    sessions
        .values()
        .filter(|s| s.user_id == user_id && s.status == SessionStatus::Active)
        .min_by_key(|s| s.eviction_order_key())
        .cloned()
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn find_active(
        &self,
        user_id: i64,
        fingerprint: &str,
    ) -> DomainResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .find(|s| {
                s.user_id == user_id
                    && s.device_fingerprint == fingerprint
                    && s.status == SessionStatus::Active
            })
            .cloned())
    }

    async fn create(&self, session: Session) -> DomainResult<Session> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.id) {
            return Err(DomainError::Validation {
                message: "Session id already exists".to_string(),
            });
        }

        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn create_bounded(
        &self,
        session: Session,
        max_sessions: u32,
    ) -> DomainResult<Session> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.id) {
            return Err(DomainError::Validation {
                message: "Session id already exists".to_string(),
            });
        }

        let active = sessions
            .values()
            .filter(|s| s.user_id == session.user_id && s.status == SessionStatus::Active)
            .count() as u32;

        if active >= max_sessions {
            if let Some(oldest) = oldest_of(&sessions, session.user_id) {
                if let Some(row) = sessions.get_mut(&oldest.id) {
                    row.revoke();
                }
            }
        }

        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn touch(
        &self,
        id: &str,
        user_agent: Option<&str>,
        token_hash: Option<&str>,
    ) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) => {
                session.touch(user_agent.map(|ua| ua.to_string()));
                if let Some(hash) = token_hash {
                    session.token_hash = hash.to_string();
                }
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("session {}", id),
            }),
        }
    }

    async fn rotate(&self, old_id: &str, replacement: Session) -> DomainResult<Session> {
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(old_id) {
            Some(old) => old.mark_used(),
            None => {
                return Err(DomainError::NotFound {
                    resource: format!("session {}", old_id),
                })
            }
        }

        sessions.insert(replacement.id.clone(), replacement.clone());
        Ok(replacement)
    }

    async fn count_active(&self, user_id: i64) -> DomainResult<u64> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.status == SessionStatus::Active)
            .count() as u64)
    }

    async fn oldest_active(&self, user_id: i64) -> DomainResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(oldest_of(&sessions, user_id))
    }

    async fn revoke_family(&self, family_id: &str) -> DomainResult<u64> {
        let mut sessions = self.sessions.write().await;
        let mut count = 0;

        for session in sessions.values_mut() {
            if session.family_id == family_id && session.status != SessionStatus::Revoked {
                session.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> DomainResult<u64> {
        let mut sessions = self.sessions.write().await;
        let mut count = 0;

        for session in sessions.values_mut() {
            if session.user_id == user_id && session.status != SessionStatus::Revoked {
                session.revoke();
                count += 1;
            }
        }

        Ok(count)
    }
}
