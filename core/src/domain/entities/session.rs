//! Refresh session entity and its lifecycle state machine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a refresh session row.
///
/// Transitions only move forward: ACTIVE→USED, ACTIVE→REVOKED, USED→REVOKED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Used,
    Revoked,
}

impl SessionStatus {
    /// Database column representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "ACTIVE",
            SessionStatus::Used => "USED",
            SessionStatus::Revoked => "REVOKED",
        }
    }

    /// Parse the database column representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(SessionStatus::Active),
            "USED" => Some(SessionStatus::Used),
            "REVOKED" => Some(SessionStatus::Revoked),
            _ => None,
        }
    }
}

/// One durable refresh session, anchoring a single device's refresh token.
///
/// The row id doubles as the `jti` claim of the refresh JWT issued for it;
/// only a one-way hash of the raw token is ever stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique token identifier (refresh JWT `jti`)
    pub id: String,

    /// User this session belongs to
    pub user_id: i64,

    /// Groups all sessions/rotations belonging to one device
    pub family_id: String,

    /// Keyed device fingerprint bound at login
    pub device_fingerprint: String,

    /// SHA-256 hex of the raw refresh token
    pub token_hash: String,

    /// Lifecycle state
    pub status: SessionStatus,

    /// Hard expiry, checked independently of status
    pub expires_at: DateTime<Utc>,

    /// Client User-Agent captured for audit, never trusted for authorization
    pub user_agent: Option<String>,

    /// Set when the session is rotated out
    pub rotated_at: Option<DateTime<Utc>>,

    /// Updated on every successful use
    pub last_used_at: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new ACTIVE session for a fresh login.
    ///
    /// A new id and family id are generated; `last_used_at` starts at the
    /// creation instant so cap-eviction ordering treats a brand-new session
    /// as the most recently used.
    pub fn new(
        user_id: i64,
        device_fingerprint: String,
        token_hash: String,
        ttl: Duration,
        user_agent: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            family_id: Uuid::new_v4().to_string(),
            device_fingerprint,
            token_hash,
            status: SessionStatus::Active,
            expires_at: now + ttl,
            user_agent,
            rotated_at: None,
            last_used_at: Some(now),
            created_at: now,
        }
    }

    /// Builds the successor row for the rotating refresh policy: fresh id,
    /// fresh expiry, same family and fingerprint. A `None` user agent keeps
    /// the one already on record.
    pub fn next_in_family(
        &self,
        token_hash: String,
        ttl: Duration,
        user_agent: Option<String>,
    ) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4().to_string(),
            user_id: self.user_id,
            family_id: self.family_id.clone(),
            device_fingerprint: self.device_fingerprint.clone(),
            token_hash,
            status: SessionStatus::Active,
            expires_at: now + ttl,
            user_agent: user_agent.or_else(|| self.user_agent.clone()),
            rotated_at: None,
            last_used_at: Some(now),
            created_at: now,
        }
    }

    /// True once the wall clock has passed `expires_at`, regardless of status
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// ACTIVE and not yet expired
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active && !self.is_expired()
    }

    /// Update the audit fields on successful use; status is untouched
    pub fn touch(&mut self, user_agent: Option<String>) {
        self.last_used_at = Some(Utc::now());
        if user_agent.is_some() {
            self.user_agent = user_agent;
        }
    }

    /// Mark this session as rotated out. Only an ACTIVE session can become
    /// USED; calls on USED/REVOKED rows are ignored.
    pub fn mark_used(&mut self) {
        if self.status == SessionStatus::Active {
            self.status = SessionStatus::Used;
            self.rotated_at = Some(Utc::now());
        }
    }

    /// Revoke this session. Valid from any state and idempotent.
    pub fn revoke(&mut self) {
        self.status = SessionStatus::Revoked;
    }

    /// Ordering key for oldest-first eviction under the session cap
    pub fn eviction_order_key(&self) -> DateTime<Utc> {
        self.last_used_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_ttl(ttl: Duration) -> Session {
        Session::new(
            7,
            "fp".to_string(),
            "hash".to_string(),
            ttl,
            Some("test-agent".to_string()),
        )
    }

    #[test]
    fn test_new_session_is_active() {
        let session = session_with_ttl(Duration::days(7));
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.is_active());
        assert!(!session.is_expired());
        assert!(session.last_used_at.is_some());
    }

    #[test]
    fn test_expiry_is_independent_of_status() {
        let mut session = session_with_ttl(Duration::days(7));
        session.expires_at = Utc::now() - Duration::seconds(1);

        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.is_expired());
        assert!(!session.is_active());
    }

    #[test]
    fn test_touch_updates_audit_only() {
        let mut session = session_with_ttl(Duration::days(7));
        let before = session.last_used_at;
        session.touch(Some("other-agent".to_string()));

        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.last_used_at >= before);
        assert_eq!(session.user_agent.as_deref(), Some("other-agent"));
    }

    #[test]
    fn test_touch_keeps_agent_when_absent() {
        let mut session = session_with_ttl(Duration::days(7));
        session.touch(None);
        assert_eq!(session.user_agent.as_deref(), Some("test-agent"));
    }

    #[test]
    fn test_status_only_moves_forward() {
        let mut session = session_with_ttl(Duration::days(7));

        session.mark_used();
        assert_eq!(session.status, SessionStatus::Used);
        assert!(session.rotated_at.is_some());

        // USED cannot go back to USED->ACTIVE, only forward to REVOKED
        session.mark_used();
        assert_eq!(session.status, SessionStatus::Used);

        session.revoke();
        assert_eq!(session.status, SessionStatus::Revoked);

        // revoking twice is a no-op
        session.revoke();
        assert_eq!(session.status, SessionStatus::Revoked);
    }

    #[test]
    fn test_revoked_session_cannot_be_marked_used() {
        let mut session = session_with_ttl(Duration::days(7));
        session.revoke();
        session.mark_used();
        assert_eq!(session.status, SessionStatus::Revoked);
        assert!(session.rotated_at.is_none());
    }

    #[test]
    fn test_next_in_family_keeps_family_and_fingerprint() {
        let session = session_with_ttl(Duration::days(7));
        let next = session.next_in_family("hash2".to_string(), Duration::days(7), None);

        assert_ne!(next.id, session.id);
        assert_eq!(next.family_id, session.family_id);
        assert_eq!(next.device_fingerprint, session.device_fingerprint);
        assert_eq!(next.token_hash, "hash2");
        assert_eq!(next.status, SessionStatus::Active);
        assert_eq!(next.user_agent.as_deref(), Some("test-agent"));
    }

    #[test]
    fn test_status_round_trips_through_column_form() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Used,
            SessionStatus::Revoked,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("GONE"), None);
    }

    #[test]
    fn test_eviction_order_key_falls_back_to_created_at() {
        let mut session = session_with_ttl(Duration::days(7));
        session.last_used_at = None;
        assert_eq!(session.eviction_order_key(), session.created_at);
    }
}
