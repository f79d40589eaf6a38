//! Identity snapshot port over the platform's user store.

mod r#trait;
pub use r#trait::IdentityRepository;

mod mock;
pub use mock::MockIdentityRepository;
