//! Core domain types for Cirrus.
//!
//! This crate holds everything that does not touch the network: configuration,
//! the unified error type, the provider record -> file view projection, size
//! and timestamp formatting, filename handling, and upload validation.

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod naming;
pub mod validation;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileStats, ProviderResource, ResourceBucket, StoredFile};
pub use validation::{UploadValidator, ValidationError};
