//! Identity repository trait, read access to user records plus the token
//! version counter.

use async_trait::async_trait;

use crate::domain::entities::subject::AuthSubject;
use crate::errors::DomainResult;

/// Read-mostly port over the platform user store.
///
/// The user profile is owned elsewhere; auth reads the snapshot it needs
/// and owns exactly one writable field, the per-user token version.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Load the auth snapshot by normalized phone number
    async fn load_by_phone(&self, phone: &str) -> DomainResult<Option<AuthSubject>>;

    /// Load the auth snapshot by user id
    async fn load_by_id(&self, user_id: i64) -> DomainResult<Option<AuthSubject>>;

    /// Increment the user's token version, invalidating every token issued
    /// under the previous version at its next `ver` comparison.
    ///
    /// # Returns
    /// * `Ok(i64)` - The new version
    /// * `Err(DomainError::NotFound)` - Unknown user
    async fn bump_token_version(&self, user_id: i64) -> DomainResult<i64>;
}
