//! Shared utilities and common types for the HailGo auth service
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types and environment loading
//! - Utility functions (phone normalization, masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    CookieConfig, DatabaseConfig, Environment, JwtConfig, LockoutConfig, SecurityConfig,
    ServerConfig,
};
pub use utils::phone;
