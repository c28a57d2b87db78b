//! Tender Backend Library
//!
//! Exposes the router and its building blocks for the server binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod tenders;

pub use api::create_router;
pub use config::Config;
