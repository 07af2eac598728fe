//! HTTP API - routes, handlers and wire models

pub mod base64;
pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::create_router;
