//! Upload handler
//!
//! Multipart form upload. Validation runs before any provider call; the
//! collision check degrades to the desired name when the listing is
//! unavailable, matching the provider's overwrite=false policy as the last
//! line of defense.

use axum::{
    extract::{Multipart, State},
    response::Redirect,
};
use tracing::{info, warn};

use cirrus_core::naming::{resolve_collision, sanitize_filename};
use cirrus_core::AppError;

use crate::error::HttpAppError;
use crate::handlers::{redirect_with_error, redirect_with_notice};
use crate::state::AppState;

/// Pull the `file` field out of the multipart body.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<(String, Vec<u8>)>, HttpAppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpAppError(AppError::InvalidInput(format!("Invalid form data: {}", e))))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| HttpAppError(AppError::InvalidInput(format!("Invalid form data: {}", e))))?;
        return Ok(Some((filename, data.to_vec())));
    }
    Ok(None)
}

pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, HttpAppError> {
    let Some((raw_filename, data)) = read_file_field(&mut multipart).await? else {
        return Ok(Redirect::to(&redirect_with_error("No file selected")));
    };

    if raw_filename.is_empty() {
        return Ok(Redirect::to(&redirect_with_error("No file selected")));
    }

    let filename = sanitize_filename(&raw_filename);
    if let Err(e) = state.validator.validate(&filename, data.len()) {
        return Ok(Redirect::to(&redirect_with_error(&e.to_string())));
    }

    // Pick a non-colliding name. A failed listing skips collision detection
    // and keeps the desired name.
    let final_name = match state.catalog.list_names().await {
        Ok(existing) => resolve_collision(&filename, &existing),
        Err(e) => {
            warn!(error = %e, "collision check unavailable, using desired name");
            filename.clone()
        }
    };

    let public_id = state.catalog.qualified_id(&final_name);
    match state
        .provider
        .upload(state.config.upload_bucket, &public_id, &final_name, data)
        .await
    {
        Ok(_) => {
            info!(name = %final_name, "file uploaded");
            Ok(Redirect::to(&redirect_with_notice(&format!(
                "File \"{}\" uploaded successfully",
                final_name
            ))))
        }
        Err(e) => {
            warn!(name = %final_name, error = %e, "upload failed");
            Ok(Redirect::to(&redirect_with_error("Upload failed")))
        }
    }
}
