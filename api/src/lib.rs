//! # HailGo API
//!
//! HTTP surface of the HailGo auth service: actix-web application factory,
//! request/response DTOs, JWT middleware, and the auth route handlers.
//!
//! The handlers stay thin. They translate transport concerns (headers,
//! cookies, JSON bodies) into domain calls on [`hg_core`] services and map
//! the resulting `DomainError`s onto the HTTP error contract.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
