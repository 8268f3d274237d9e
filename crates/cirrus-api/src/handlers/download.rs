//! Download handlers
//!
//! Two paths: by display name (legacy, proxies the bytes through this
//! process with a `Content-Disposition: attachment` header) and by provider
//! id (redirects to a signed provider URL, no proxying).

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::Redirect,
};
use bytes::Bytes;
use tracing::debug;

use cirrus_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn download_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(HeaderMap, Bytes), HttpAppError> {
    let file = state
        .catalog
        .find_by_name(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File not found: {}", name)))?;

    debug!(name = %name, public_id = %file.public_id, "proxying download");
    let bytes = state
        .provider
        .fetch(file.resource_type, &file.public_id)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    // Sanitized names are plain ASCII, but fall back to a fixed name rather
    // than produce an invalid header.
    let disposition = format!("attachment; filename=\"{}\"", file.name);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"download\"")),
    );

    Ok((headers, bytes))
}

pub async fn download_file_by_id(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Redirect, HttpAppError> {
    let file = state
        .catalog
        .find_by_public_id(&public_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File not found: {}", public_id)))?;

    let url = state
        .provider
        .signed_download_url(file.resource_type, &file.public_id);
    debug!(public_id = %public_id, "redirecting to signed URL");
    Ok(Redirect::temporary(&url))
}
