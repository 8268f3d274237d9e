//! Provider client for Cirrus.
//!
//! Defines the `Provider` trait the rest of the application programs against
//! and a Cloudinary-compatible HTTP implementation of it. The hosted service
//! is the only store: nothing is written locally.

pub mod cloudinary;
pub mod sign;
pub mod traits;

pub use cloudinary::CloudinaryClient;
pub use traits::{DestroyOutcome, Provider, ProviderError, ProviderResult};
