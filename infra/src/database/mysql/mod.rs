//! MySQL repository implementations

mod credential_verifier_impl;
mod identity_repository_impl;
mod lockout_repository_impl;
mod session_repository_impl;

pub use credential_verifier_impl::MySqlCredentialVerifier;
pub use identity_repository_impl::MySqlIdentityRepository;
pub use lockout_repository_impl::MySqlLockoutRepository;
pub use session_repository_impl::MySqlSessionRepository;
