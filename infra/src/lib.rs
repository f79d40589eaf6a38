//! # HailGo Infrastructure
//!
//! MySQL-backed implementations of the `hg_core` repository contracts,
//! plus connection pool management. Everything here stays behind the
//! traits; the service layer never sees SQLx types.

pub mod database;

pub use database::connection::DatabasePool;
pub use database::mysql::{
    MySqlCredentialVerifier, MySqlIdentityRepository, MySqlLockoutRepository,
    MySqlSessionRepository,
};
