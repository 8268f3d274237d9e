//! Cirrus API Library
//!
//! This crate provides the HTTP handlers, application state, and server
//! setup for the Cirrus file manager.

// Module declarations
mod api_doc;
mod handlers;
mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::catalog::FileCatalog;
