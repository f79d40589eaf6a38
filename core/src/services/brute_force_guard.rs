//! Failed-authentication guard in front of the credential check.

use std::sync::Arc;

use chrono::Utc;
use hg_shared::utils::phone::mask_phone_number;

use crate::domain::entities::lockout::GuardScope;
use crate::domain::value_objects::DeviceContext;
use crate::errors::{AuthError, DomainResult};
use crate::repositories::LockoutRepository;

/// Thin coordinator over the lockout port.
///
/// The strike and window arithmetic lives on `BruteForceCounter`; the
/// repository runs it atomically. This service only reads the lockout
/// state and forwards failure/success events.
pub struct BruteForceGuard<L: LockoutRepository> {
    lockouts: Arc<L>,
}

impl<L: LockoutRepository> BruteForceGuard<L> {
    pub fn new(lockouts: Arc<L>) -> Self {
        Self { lockouts }
    }

    /// Fail fast with `RateLimited` when a lockout is in force.
    ///
    /// Runs before any credential work so locked subjects never reach the
    /// password check.
    pub async fn check_locked(&self, subject_id: &str, scope: GuardScope) -> DomainResult<()> {
        let now = Utc::now();
        if let Some(counter) = self.lockouts.find(subject_id, scope).await? {
            if counter.is_locked_at(now) {
                let retry_after_seconds = counter.retry_after_seconds(now);
                tracing::warn!(
                    subject = %mask_phone_number(subject_id),
                    scope = scope.as_str(),
                    retry_after_seconds,
                    "Rejected attempt from locked subject"
                );
                return Err(AuthError::RateLimited {
                    retry_after_seconds,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Register one failed attempt
    pub async fn record_failure(
        &self,
        subject_id: &str,
        scope: GuardScope,
        device: &DeviceContext,
    ) -> DomainResult<()> {
        let counter = self.lockouts.record_failure(subject_id, scope, device).await?;
        if counter.locked_until.is_some() {
            tracing::warn!(
                subject = %mask_phone_number(subject_id),
                scope = scope.as_str(),
                failed_attempts = counter.failed_attempts,
                "Subject locked out after repeated failures"
            );
        }
        Ok(())
    }

    /// Clear strike, window, and lockout after a successful attempt
    pub async fn record_success(&self, subject_id: &str, scope: GuardScope) -> DomainResult<()> {
        self.lockouts.record_success(subject_id, scope).await
    }
}
