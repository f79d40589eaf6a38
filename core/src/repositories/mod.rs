//! Persistence and collaborator ports consumed by the domain services.

pub mod credential;
pub mod identity;
pub mod lockout;
pub mod session;

pub use credential::{CredentialVerifier, MockCredentialVerifier};
pub use identity::{IdentityRepository, MockIdentityRepository};
pub use lockout::{LockoutRepository, MockLockoutRepository};
pub use session::{MockSessionRepository, SessionRepository};
