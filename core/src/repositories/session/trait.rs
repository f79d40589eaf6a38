//! Session repository trait defining the interface for refresh session persistence.

use async_trait::async_trait;

use crate::domain::entities::session::Session;
use crate::errors::DomainResult;

/// Repository contract for refresh session rows.
///
/// A row stores the hashed refresh credential, never the token itself.
/// Status transitions are forward-only (ACTIVE to USED or REVOKED);
/// implementations must not resurrect a terminal row.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by its id (the refresh token's `jti`)
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Session>>;

    /// Find the ACTIVE session for a (user, device fingerprint) pair.
    ///
    /// At most one such row exists; login reuses it instead of inserting
    /// a new row per attempt.
    async fn find_active(&self, user_id: i64, fingerprint: &str)
        -> DomainResult<Option<Session>>;

    /// Insert a new ACTIVE session row
    ///
    /// # Returns
    /// * `Ok(Session)` - The stored session
    /// * `Err(DomainError)` - Insert failed (e.g. duplicate id)
    async fn create(&self, session: Session) -> DomainResult<Session>;

    /// Insert a new ACTIVE session row while enforcing the per-user cap.
    ///
    /// Runs as one atomic unit: count the user's ACTIVE rows, revoke the
    /// single oldest (ordered by last use, falling back to creation time)
    /// when the count has reached `max_sessions`, then insert. Two
    /// concurrent logins must not both pass the cap check.
    async fn create_bounded(&self, session: Session, max_sessions: u32)
        -> DomainResult<Session>;

    /// Update `last_used_at` and the stored user agent without touching
    /// status. `token_hash` replaces the stored credential hash when login
    /// reuse signed a fresh refresh JWT for this row; the non-rotating
    /// refresh path passes `None` since it re-sends the same credential.
    ///
    /// # Returns
    /// * `Ok(())` - Row updated
    /// * `Err(DomainError::NotFound)` - No row with this id
    async fn touch(
        &self,
        id: &str,
        user_agent: Option<&str>,
        token_hash: Option<&str>,
    ) -> DomainResult<()>;

    /// Mark the old session USED and insert its replacement in the same
    /// family. Rotating-policy alternative to `touch`.
    async fn rotate(&self, old_id: &str, replacement: Session) -> DomainResult<Session>;

    /// Number of ACTIVE sessions for a user
    async fn count_active(&self, user_id: i64) -> DomainResult<u64>;

    /// The ACTIVE session that would be evicted first under the cap,
    /// ordered by `last_used_at` with `created_at` as fallback
    async fn oldest_active(&self, user_id: i64) -> DomainResult<Option<Session>>;

    /// Set every non-REVOKED session in the family to REVOKED.
    ///
    /// Idempotent: revoking an already-revoked family affects zero rows
    /// and still succeeds.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows transitioned
    async fn revoke_family(&self, family_id: &str) -> DomainResult<u64>;

    /// Set every non-REVOKED session belonging to the user to REVOKED
    async fn revoke_all_for_user(&self, user_id: i64) -> DomainResult<u64>;
}
