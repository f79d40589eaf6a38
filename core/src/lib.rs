//! # HailGo Core
//!
//! Token lifecycle and session security for the HailGo backend.
//! This crate contains the domain entities, services, repository interfaces,
//! and error types behind login, token refresh, and revocation.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use repositories::*;
pub use errors::*;
