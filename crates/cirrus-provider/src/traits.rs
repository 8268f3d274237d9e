//! Provider abstraction trait
//!
//! This module defines the Provider trait the media backend must implement.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use cirrus_core::models::{ProviderResource, ResourceBucket};

/// Provider operation errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unexpected provider response: {0}")]
    BadResponse(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result of a destroy call.
///
/// The provider reports "not found" in the response body with a 200 status,
/// so absence is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Deleted,
    NotFound,
}

/// Provider abstraction trait
///
/// The one seam between the application and the hosted media service. The
/// HTTP implementation lives in [`crate::cloudinary`]; tests substitute a
/// stub.
#[async_trait]
pub trait Provider: Send + Sync {
    /// List resources in one bucket, newest first as the provider returns
    /// them. `max_results` caps the page size.
    async fn list(
        &self,
        bucket: ResourceBucket,
        max_results: u32,
    ) -> ProviderResult<Vec<ProviderResource>>;

    /// Upload `data` under the exact `public_id` into `bucket`.
    ///
    /// The id must already be collision-free: the call never overwrites an
    /// existing object. Returns the provider's record for the new object.
    async fn upload(
        &self,
        bucket: ResourceBucket,
        public_id: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> ProviderResult<ProviderResource>;

    /// Destroy the object with `public_id` in `bucket`.
    async fn destroy(
        &self,
        bucket: ResourceBucket,
        public_id: &str,
    ) -> ProviderResult<DestroyOutcome>;

    /// Build a signed delivery URL for the object, valid for the configured
    /// TTL. Does not contact the provider.
    fn signed_download_url(&self, bucket: ResourceBucket, public_id: &str) -> String;

    /// Fetch the object's bytes through the signed delivery URL.
    async fn fetch(&self, bucket: ResourceBucket, public_id: &str) -> ProviderResult<Bytes>;
}
