//! Session and token invalidation.

use std::sync::Arc;

use crate::errors::DomainResult;
use crate::repositories::{IdentityRepository, SessionRepository};

/// Tears down sessions at two blast radii: one device family, or every
/// token a user has ever been issued.
pub struct RevocationService<S, I>
where
    S: SessionRepository,
    I: IdentityRepository,
{
    sessions: Arc<S>,
    identities: Arc<I>,
}

impl<S, I> RevocationService<S, I>
where
    S: SessionRepository,
    I: IdentityRepository,
{
    pub fn new(sessions: Arc<S>, identities: Arc<I>) -> Self {
        Self {
            sessions,
            identities,
        }
    }

    /// Revoke every session in one device family. Idempotent.
    pub async fn revoke_family(&self, family_id: &str) -> DomainResult<u64> {
        let revoked = self.sessions.revoke_family(family_id).await?;
        if revoked > 0 {
            tracing::info!(family_id, revoked, "Revoked session family");
        }
        Ok(revoked)
    }

    /// Invalidate every outstanding token for a user.
    ///
    /// Bumps the user's token version first, which makes every previously
    /// issued access and refresh token fail its next `ver` comparison even
    /// though signature and expiry remain valid, then revokes the user's
    /// session rows so the durable state agrees.
    ///
    /// # Returns
    /// * `Ok(i64)` - The new token version
    pub async fn revoke_all_for_user(&self, user_id: i64) -> DomainResult<i64> {
        let version = self.identities.bump_token_version(user_id).await?;
        let revoked = self.sessions.revoke_all_for_user(user_id).await?;
        tracing::info!(
            user_id,
            version,
            revoked,
            "Invalidated all tokens for user"
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::entities::session::{Session, SessionStatus};
    use crate::domain::entities::subject::{AuthSubject, Role};
    use crate::repositories::{MockIdentityRepository, MockSessionRepository};

    fn subject(user_id: i64) -> AuthSubject {
        AuthSubject {
            user_id,
            phone: format!("+9989012345{:02}", user_id),
            roles: vec![Role::Client],
            token_version: 1,
            is_active: true,
            is_blocked: false,
        }
    }

    fn session_for(user_id: i64, fingerprint: &str) -> Session {
        Session::new(
            user_id,
            fingerprint.to_string(),
            "hash".to_string(),
            Duration::days(7),
            None,
        )
    }

    async fn service() -> (
        RevocationService<MockSessionRepository, MockIdentityRepository>,
        Arc<MockSessionRepository>,
        Arc<MockIdentityRepository>,
    ) {
        let sessions = Arc::new(MockSessionRepository::new());
        let identities = Arc::new(MockIdentityRepository::new());
        identities.insert(subject(1)).await;
        (
            RevocationService::new(sessions.clone(), identities.clone()),
            sessions,
            identities,
        )
    }

    #[tokio::test]
    async fn test_revoke_family_only_hits_that_family() {
        let (service, sessions, _) = service().await;
        let session_a = session_for(1, "fp-a");
        let family_a = session_a.family_id.clone();
        let session_b = session_for(1, "fp-b");
        let id_b = session_b.id.clone();
        sessions.create(session_a).await.unwrap();
        sessions.create(session_b).await.unwrap();

        assert_eq!(service.revoke_family(&family_a).await.unwrap(), 1);

        let untouched = sessions.find_by_id(&id_b).await.unwrap().unwrap();
        assert_eq!(untouched.status, SessionStatus::Active);

        // second revoke is a no-op
        assert_eq!(service.revoke_family(&family_a).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revoke_all_bumps_version_and_clears_rows() {
        let (service, sessions, identities) = service().await;
        sessions.create(session_for(1, "fp-a")).await.unwrap();
        sessions.create(session_for(1, "fp-b")).await.unwrap();

        let version = service.revoke_all_for_user(1).await.unwrap();
        assert_eq!(version, 2);

        assert_eq!(sessions.count_active(1).await.unwrap(), 0);
        let reloaded = identities.load_by_id(1).await.unwrap().unwrap();
        assert_eq!(reloaded.token_version, 2);
    }

    #[tokio::test]
    async fn test_revoke_all_for_unknown_user_fails() {
        let (service, _, _) = service().await;
        assert!(service.revoke_all_for_user(99).await.is_err());
    }
}
