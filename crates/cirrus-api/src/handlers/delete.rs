//! Delete handlers
//!
//! Deleting by display name resolves the name to a (bucket, id) pair first.
//! Deleting by id has no bucket information, so it walks the fixed probe
//! order and stops on the first bucket that reports a deletion. An absent
//! object is a not-found outcome, distinct from a provider failure.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::{info, warn};

use cirrus_core::models::ResourceBucket;
use cirrus_provider::DestroyOutcome;

use crate::error::HttpAppError;
use crate::handlers::{redirect_with_error, redirect_with_notice};
use crate::state::AppState;

pub async fn delete_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Redirect, HttpAppError> {
    let found = match state.catalog.find_by_name(&name).await {
        Ok(found) => found,
        Err(e) => {
            warn!(name = %name, error = %e, "delete lookup failed");
            return Ok(Redirect::to(&redirect_with_error(
                "Cloud storage is unavailable",
            )));
        }
    };

    let Some(file) = found else {
        return Ok(Redirect::to(&redirect_with_error(&format!(
            "File \"{}\" not found",
            name
        ))));
    };

    match state
        .provider
        .destroy(file.resource_type, &file.public_id)
        .await
    {
        Ok(DestroyOutcome::Deleted) => {
            info!(name = %name, public_id = %file.public_id, "file deleted");
            Ok(Redirect::to(&redirect_with_notice(&format!(
                "File \"{}\" deleted successfully",
                name
            ))))
        }
        Ok(DestroyOutcome::NotFound) => {
            // Raced with another deletion between lookup and destroy.
            Ok(Redirect::to(&redirect_with_error(&format!(
                "File \"{}\" not found",
                name
            ))))
        }
        Err(e) => {
            warn!(name = %name, error = %e, "delete failed");
            Ok(Redirect::to(&redirect_with_error("Delete failed")))
        }
    }
}

pub async fn delete_file_by_id(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Redirect, HttpAppError> {
    let mut failures = 0;

    for bucket in ResourceBucket::LOOKUP_ORDER {
        match state.provider.destroy(bucket, &public_id).await {
            Ok(DestroyOutcome::Deleted) => {
                info!(public_id = %public_id, bucket = %bucket, "file deleted");
                return Ok(Redirect::to(&redirect_with_notice(
                    "File deleted successfully",
                )));
            }
            Ok(DestroyOutcome::NotFound) => continue,
            Err(e) => {
                warn!(public_id = %public_id, bucket = %bucket, error = %e, "destroy failed");
                failures += 1;
            }
        }
    }

    if failures == ResourceBucket::LOOKUP_ORDER.len() {
        Ok(Redirect::to(&redirect_with_error(
            "Cloud storage is unavailable",
        )))
    } else {
        Ok(Redirect::to(&redirect_with_error(&format!(
            "File \"{}\" not found",
            public_id
        ))))
    }
}
