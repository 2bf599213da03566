//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the recordings query endpoint
//! - Lenient query string parsing
//! - Request logging and CORS middleware

pub mod handlers;
pub mod middleware;
pub mod query;
pub mod routes;

pub use routes::create_router;
