//! Domain services for the authentication and session-security core

pub mod auth_service;
pub mod brute_force_guard;
pub mod device_binder;
pub mod revocation_service;
pub mod token_codec;

pub use auth_service::{AuthConfig, AuthService};
pub use brute_force_guard::BruteForceGuard;
pub use device_binder::DeviceBinder;
pub use revocation_service::RevocationService;
pub use token_codec::TokenCodec;
