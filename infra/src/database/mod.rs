//! Database module - MySQL implementations using SQLx
//!
//! Connection pool management, schema migrations, and the repository
//! implementations behind the `hg_core` persistence traits.

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{
    MySqlCredentialVerifier, MySqlIdentityRepository, MySqlLockoutRepository,
    MySqlSessionRepository,
};
