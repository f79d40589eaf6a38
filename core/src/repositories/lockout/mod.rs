//! Brute-force counter persistence port.

mod r#trait;
pub use r#trait::LockoutRepository;

mod mock;
pub use mock::MockLockoutRepository;

#[cfg(test)]
mod tests;
