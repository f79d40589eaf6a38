//! Authentication flows: login, refresh, and logout.
//!
//! This service coordinates the credential check, the brute-force guard,
//! device binding, the durable session store, and the token codec. The
//! HTTP layer stays a thin shell around these three entry points.

use std::sync::Arc;

use chrono::Duration;

use hg_shared::config::SecurityConfig;
use hg_shared::utils::phone::{is_valid_phone, mask_phone_number, normalize_phone_number};

use crate::domain::entities::lockout::GuardScope;
use crate::domain::entities::session::{Session, SessionStatus};
use crate::domain::entities::subject::AuthSubject;
use crate::domain::value_objects::{DeviceContext, IssuedTokens};
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::{
    CredentialVerifier, IdentityRepository, LockoutRepository, SessionRepository,
};
use crate::services::brute_force_guard::BruteForceGuard;
use crate::services::device_binder::DeviceBinder;
use crate::services::token_codec::TokenCodec;

/// Configuration for the authentication flows
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Maximum concurrent refresh sessions (devices) per user
    pub max_sessions: u32,

    /// Rotate the session row on every refresh instead of touching the
    /// existing one. Off by default: one device keeps one row.
    pub rotate_refresh_sessions: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_sessions: 5,
            rotate_refresh_sessions: false,
        }
    }
}

impl AuthConfig {
    pub fn from_security(config: &SecurityConfig) -> Self {
        Self {
            max_sessions: config.max_sessions,
            ..Default::default()
        }
    }
}

/// Coordinator for the complete authentication lifecycle
pub struct AuthService<S, L, I, C>
where
    S: SessionRepository,
    L: LockoutRepository,
    I: IdentityRepository,
    C: CredentialVerifier,
{
    sessions: Arc<S>,
    guard: BruteForceGuard<L>,
    identities: Arc<I>,
    credentials: Arc<C>,
    tokens: Arc<TokenCodec>,
    devices: DeviceBinder,
    config: AuthConfig,
}

impl<S, L, I, C> AuthService<S, L, I, C>
where
    S: SessionRepository,
    L: LockoutRepository,
    I: IdentityRepository,
    C: CredentialVerifier,
{
    pub fn new(
        sessions: Arc<S>,
        lockouts: Arc<L>,
        identities: Arc<I>,
        credentials: Arc<C>,
        tokens: Arc<TokenCodec>,
        devices: DeviceBinder,
        config: AuthConfig,
    ) -> Self {
        Self {
            sessions,
            guard: BruteForceGuard::new(lockouts),
            identities,
            credentials,
            tokens,
            devices,
            config,
        }
    }

    /// Authenticate with phone and password, returning a fresh token pair.
    ///
    /// A device that already holds a live session gets its row reused
    /// rather than a new one per login; a new device enters under the
    /// per-user session cap.
    pub async fn login(
        &self,
        phone: &str,
        password: &str,
        device: &DeviceContext,
    ) -> DomainResult<IssuedTokens> {
        // Step 1: Normalize and validate the login identifier
        let normalized = normalize_phone_number(phone);
        if !is_valid_phone(&normalized) {
            return Err(AuthError::InvalidPhoneFormat {
                phone: mask_phone_number(phone),
            }
            .into());
        }

        // Step 2: Locked subjects never reach the credential check
        self.guard
            .check_locked(&normalized, GuardScope::Login)
            .await?;

        // Step 3: Load the subject and verify the password. Unknown phone
        // and wrong password are reported identically so callers cannot
        // probe which phones exist; a blocked account keeps its own variant
        // internally and collapses to the same response at the boundary.
        let subject = match self.identities.load_by_phone(&normalized).await? {
            Some(subject) => subject,
            None => {
                self.guard
                    .record_failure(&normalized, GuardScope::Login, device)
                    .await?;
                return Err(AuthError::AuthenticationFailed.into());
            }
        };

        if !subject.can_authenticate() {
            tracing::warn!(
                user_id = subject.user_id,
                "Login attempt for inactive or blocked user"
            );
            self.guard
                .record_failure(&normalized, GuardScope::Login, device)
                .await?;
            return Err(AuthError::UserBlocked.into());
        }

        if !self.credentials.verify(subject.user_id, password).await? {
            self.guard
                .record_failure(&normalized, GuardScope::Login, device)
                .await?;
            return Err(AuthError::AuthenticationFailed.into());
        }

        self.guard
            .record_success(&normalized, GuardScope::Login)
            .await?;

        // Step 4: Bind the calling device
        let fingerprint = self.devices.fingerprint(device, subject.user_id)?;

        // Step 5: Reuse the device's session when one is still live
        if let Some(session) = self
            .sessions
            .find_active(subject.user_id, &fingerprint)
            .await?
        {
            if !session.is_expired() {
                let refresh_token =
                    self.tokens
                        .issue_refresh(&subject, &session.id, &session.family_id)?;
                self.sessions
                    .touch(
                        &session.id,
                        device.user_agent.as_deref(),
                        Some(&TokenCodec::hash_token(&refresh_token)),
                    )
                    .await?;
                tracing::debug!(
                    user_id = subject.user_id,
                    session_id = %session.id,
                    "Reusing device session"
                );
                return self.issued(&subject, refresh_token);
            }
            // expired but still ACTIVE: retire the stale row first
            self.sessions.revoke_family(&session.family_id).await?;
        }

        // Step 6: Create a session under the per-user cap
        let mut session = Session::new(
            subject.user_id,
            fingerprint,
            String::new(),
            Duration::seconds(self.tokens.refresh_ttl_seconds()),
            device.user_agent.clone(),
        );
        let refresh_token =
            self.tokens
                .issue_refresh(&subject, &session.id, &session.family_id)?;
        session.token_hash = TokenCodec::hash_token(&refresh_token);
        self.sessions
            .create_bounded(session, self.config.max_sessions)
            .await?;

        tracing::info!(user_id = subject.user_id, "User logged in");
        self.issued(&subject, refresh_token)
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// Validation order matters: global invalidation (token version) is
    /// checked before the session row, and every failure past signature
    /// verification revokes the whole family.
    pub async fn refresh(
        &self,
        raw_refresh: &str,
        device: &DeviceContext,
    ) -> DomainResult<IssuedTokens> {
        // Step 1: Nothing presented
        if raw_refresh.trim().is_empty() {
            return Err(AuthError::SessionNotFound.into());
        }

        // Step 2: Signature, lifetime, and flavor checks
        let claims = self.tokens.verify_refresh(raw_refresh)?;
        let family_id = claims.fid.clone().ok_or(TokenError::TokenInvalid)?;

        // Step 3: Global invalidation precedes every per-session check
        let subject = match self.identities.load_by_id(claims.uid).await? {
            Some(subject) => subject,
            None => {
                self.sessions.revoke_family(&family_id).await?;
                return Err(AuthError::SessionNotFound.into());
            }
        };

        if claims.ver != subject.token_version {
            self.sessions.revoke_family(&family_id).await?;
            tracing::warn!(
                user_id = subject.user_id,
                "Refresh with an outdated token version"
            );
            return Err(AuthError::VersionMismatch.into());
        }

        // Step 4: The durable session row must exist and be live
        let session = match self.sessions.find_by_id(&claims.jti).await? {
            Some(session) if session.status == SessionStatus::Active => session,
            _ => {
                self.sessions.revoke_family(&family_id).await?;
                return Err(AuthError::SessionNotFound.into());
            }
        };

        if session.is_expired() {
            self.sessions.revoke_family(&family_id).await?;
            return Err(TokenError::TokenExpired.into());
        }

        // Step 5: The presenting device must be the bound one
        let presented = self.devices.fingerprint(device, subject.user_id)?;
        if !self.devices.matches(&session.device_fingerprint, &presented) {
            self.sessions.revoke_family(&family_id).await?;
            tracing::warn!(
                user_id = subject.user_id,
                session_id = %session.id,
                "Refresh from an unrecognized device"
            );
            return Err(AuthError::DeviceMismatch.into());
        }

        // Step 6: Touch in place or rotate, per policy
        let refresh_token = if self.config.rotate_refresh_sessions {
            let mut replacement = session.next_in_family(
                String::new(),
                Duration::seconds(self.tokens.refresh_ttl_seconds()),
                device.user_agent.clone(),
            );
            let refresh_token =
                self.tokens
                    .issue_refresh(&subject, &replacement.id, &replacement.family_id)?;
            replacement.token_hash = TokenCodec::hash_token(&refresh_token);
            self.sessions.rotate(&session.id, replacement).await?;
            refresh_token
        } else {
            self.sessions
                .touch(&session.id, device.user_agent.as_deref(), None)
                .await?;
            raw_refresh.to_string()
        };

        self.issued(&subject, refresh_token)
    }

    /// Tear down the session family behind a refresh token.
    ///
    /// Best-effort: an absent or unusable token is ignored, so the caller
    /// learns nothing about token validity and repeated logouts succeed.
    pub async fn logout(&self, raw_refresh: Option<&str>) -> DomainResult<()> {
        let raw = match raw_refresh {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(()),
        };

        match self.tokens.verify_refresh(raw) {
            Ok(claims) => {
                if let Some(family_id) = claims.fid {
                    if let Err(e) = self.sessions.revoke_family(&family_id).await {
                        tracing::warn!(error = %e, "Failed to revoke session family on logout");
                    }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Logout presented an unusable refresh token");
            }
        }

        Ok(())
    }

    fn issued(&self, subject: &AuthSubject, refresh_token: String) -> DomainResult<IssuedTokens> {
        let access_token = self.tokens.issue_access(subject)?;
        Ok(IssuedTokens::new(
            access_token,
            refresh_token,
            self.tokens.access_ttl_seconds(),
            self.tokens.refresh_ttl_seconds(),
        ))
    }
}
