//! Password verification port.

mod r#trait;
pub use r#trait::CredentialVerifier;

mod mock;
pub use mock::MockCredentialVerifier;
