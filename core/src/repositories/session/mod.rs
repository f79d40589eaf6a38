//! Refresh session persistence port.

mod r#trait;
pub use r#trait::SessionRepository;

mod mock;
pub use mock::MockSessionRepository;
