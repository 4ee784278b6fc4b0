//! Shared building blocks for the database provisioner driver.
//!
//! Configuration, the error taxonomy, the API response envelope,
//! request-id middleware, wire models and identifier sanitization.

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;
