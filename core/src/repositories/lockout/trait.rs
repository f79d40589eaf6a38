//! Lockout repository trait for brute-force counter persistence.

use async_trait::async_trait;

use crate::domain::entities::lockout::{BruteForceCounter, GuardScope};
use crate::domain::value_objects::DeviceContext;
use crate::errors::DomainResult;

/// Repository contract for per-(subject, scope) failure counters.
///
/// `record_failure` and `record_success` are atomic read-modify-write
/// operations: an implementation must serialize concurrent calls for the
/// same (subject, scope) so no increment is lost. The window and strike
/// arithmetic itself lives on `BruteForceCounter`; implementations run the
/// entity methods inside their critical section. Counter tunables come
/// from the `LockoutConfig` the implementation was constructed with.
#[async_trait]
pub trait LockoutRepository: Send + Sync {
    /// Load the counter for one (subject, scope) pair, `None` when the
    /// subject has never failed on this scope
    async fn find(
        &self,
        subject_id: &str,
        scope: GuardScope,
    ) -> DomainResult<Option<BruteForceCounter>>;

    /// Register one failed attempt, creating the counter on first failure.
    ///
    /// The device context only feeds audit columns.
    ///
    /// # Returns
    /// * `Ok(BruteForceCounter)` - Counter state after the update
    async fn record_failure(
        &self,
        subject_id: &str,
        scope: GuardScope,
        device: &DeviceContext,
    ) -> DomainResult<BruteForceCounter>;

    /// Clear strike, window, and lockout after a successful attempt.
    /// A missing counter is a no-op.
    async fn record_success(&self, subject_id: &str, scope: GuardScope) -> DomainResult<()>;
}
