//! Value objects shared across the auth flows.

pub mod device_context;
pub mod issued_tokens;

pub use device_context::DeviceContext;
pub use issued_tokens::IssuedTokens;
