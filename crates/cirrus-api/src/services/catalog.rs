//! File catalog
//!
//! Aggregates the provider's per-bucket listings into one view. The provider
//! is queried fresh on every call; there is no cache to invalidate.
//!
//! Partial failure policy: one unreachable bucket degrades the listing, it
//! does not fail it. Only when every bucket errors does the caller see a
//! provider error. Name lookups distinguish "no bucket had it" (a clean
//! not-found) from "no bucket answered" (an outage).

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use cirrus_core::models::{FileStats, ResourceBucket, StoredFile};
use cirrus_core::AppError;
use cirrus_provider::Provider;

#[derive(Clone)]
pub struct FileCatalog {
    provider: Arc<dyn Provider>,
    folder: String,
    list_max_results: u32,
    stats_max_results: u32,
}

impl FileCatalog {
    pub fn new(
        provider: Arc<dyn Provider>,
        folder: String,
        list_max_results: u32,
        stats_max_results: u32,
    ) -> Self {
        Self {
            provider,
            folder,
            list_max_results,
            stats_max_results,
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Qualify a display name with the configured folder prefix, producing
    /// the provider id new uploads are stored under.
    pub fn qualified_id(&self, name: &str) -> String {
        format!("{}/{}", self.folder, name)
    }

    async fn collect(&self, max_results: u32) -> Result<Vec<StoredFile>, AppError> {
        let mut files = Vec::new();
        let mut failures = Vec::new();

        for bucket in ResourceBucket::ALL {
            match self.provider.list(bucket, max_results).await {
                Ok(resources) => {
                    files.extend(
                        resources
                            .iter()
                            .map(|r| StoredFile::project(r, bucket)),
                    );
                }
                Err(e) => {
                    warn!(bucket = %bucket, error = %e, "bucket listing failed, continuing");
                    failures.push(format!("{}: {}", bucket, e));
                }
            }
        }

        if files.is_empty() && failures.len() == ResourceBucket::ALL.len() {
            return Err(AppError::Provider(failures.join("; ")));
        }

        // Newest first. Unknown timestamps compare below every known one,
        // so they sink to the end.
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    /// Full listing across all buckets, newest first.
    pub async fn list_all(&self) -> Result<Vec<StoredFile>, AppError> {
        self.collect(self.list_max_results).await
    }

    /// Display names currently in use, for collision resolution.
    pub async fn list_names(&self) -> Result<Vec<String>, AppError> {
        let files = self.list_all().await?;
        Ok(files.into_iter().map(|f| f.name).collect())
    }

    /// Resolve a display name to its stored file.
    ///
    /// Probes buckets in [`ResourceBucket::LOOKUP_ORDER`] and short-circuits
    /// on the first exact match. `Ok(None)` means at least one bucket
    /// answered and none had the name; an error means no bucket answered.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<StoredFile>, AppError> {
        self.find(|f| f.name == name, &format!("name {}", name))
            .await
    }

    /// Resolve a provider id to its stored file. Same probe policy as
    /// [`Self::find_by_name`].
    pub async fn find_by_public_id(&self, public_id: &str) -> Result<Option<StoredFile>, AppError> {
        self.find(|f| f.public_id == public_id, &format!("id {}", public_id))
            .await
    }

    async fn find<F>(&self, matches: F, what: &str) -> Result<Option<StoredFile>, AppError>
    where
        F: Fn(&StoredFile) -> bool,
    {
        let mut any_answered = false;
        let mut failures = Vec::new();

        for bucket in ResourceBucket::LOOKUP_ORDER {
            match self.provider.list(bucket, self.list_max_results).await {
                Ok(resources) => {
                    any_answered = true;
                    if let Some(found) = resources
                        .iter()
                        .map(|r| StoredFile::project(r, bucket))
                        .find(&matches)
                    {
                        return Ok(Some(found));
                    }
                }
                Err(e) => {
                    warn!(bucket = %bucket, error = %e, "bucket probe failed, continuing");
                    failures.push(format!("{}: {}", bucket, e));
                }
            }
        }

        if any_answered {
            Ok(None)
        } else {
            Err(AppError::Provider(format!(
                "lookup of {} failed in every bucket: {}",
                what,
                failures.join("; ")
            )))
        }
    }

    /// Aggregate statistics over a wider listing window than the UI page.
    pub async fn stats(&self) -> Result<FileStats, AppError> {
        let files = self.collect(self.stats_max_results).await?;
        Ok(FileStats::from_files(&files, Utc::now()))
    }
}
