//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing and refresh-cookie configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection
//! - `security` - Device binding secret, session cap, lockout tuning
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod security;
pub mod server;

// Re-export commonly used types
pub use auth::{CookieConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use security::{LockoutConfig, SecurityConfig};
pub use server::ServerConfig;
