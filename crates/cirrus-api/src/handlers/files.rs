//! JSON introspection endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use cirrus_core::models::{FileStats, ResourceBucket, StoredFile};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "All stored files, newest first", body = [StoredFile]),
        (status = 502, description = "Provider unavailable", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredFile>>, HttpAppError> {
    let files = state.catalog.list_all().await?;
    Ok(Json(files))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "files",
    responses(
        (status = 200, description = "Aggregate statistics", body = FileStats),
        (status = 502, description = "Provider unavailable", body = ErrorResponse)
    )
)]
pub async fn stats(State(state): State<AppState>) -> Result<Json<FileStats>, HttpAppError> {
    let stats = state.catalog.stats().await?;
    Ok(Json(stats))
}

/// Raw per-bucket listing for troubleshooting name resolution.
#[derive(Debug, Serialize, ToSchema)]
pub struct RawBucketListing {
    pub bucket: String,
    /// Provider records as received, or the error that bucket returned.
    pub resources: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/files/raw",
    tag = "files",
    responses(
        (status = 200, description = "Unprojected provider records per bucket", body = [RawBucketListing])
    )
)]
pub async fn list_files_raw(State(state): State<AppState>) -> Json<Vec<RawBucketListing>> {
    let mut listings = Vec::with_capacity(ResourceBucket::ALL.len());

    for bucket in ResourceBucket::ALL {
        let entry = match state
            .provider
            .list(bucket, state.config.list_max_results)
            .await
        {
            Ok(resources) => RawBucketListing {
                bucket: bucket.to_string(),
                resources: serde_json::to_value(&resources).ok(),
                error: None,
            },
            Err(e) => RawBucketListing {
                bucket: bucket.to_string(),
                resources: None,
                error: Some(e.to_string()),
            },
        };
        listings.push(entry);
    }

    Json(listings)
}
