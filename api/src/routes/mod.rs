//! Route handlers grouped by API area.

pub mod auth;
