//! Domain models
//!
//! The provider is the source of truth: nothing here is persisted locally.
//! `ProviderResource` is the permissive wire record returned by the provider's
//! listing/upload endpoints, and `StoredFile` is the stable view projected
//! from it on every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::format::{self, format_size};

/// Resource-type bucket the provider partitions objects into.
///
/// Delete and fetch calls must name the bucket holding the object, so the
/// bucket travels with every projected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceBucket {
    Image,
    Video,
    Raw,
}

impl ResourceBucket {
    /// All buckets, in listing fan-out order.
    pub const ALL: [ResourceBucket; 3] = [
        ResourceBucket::Image,
        ResourceBucket::Video,
        ResourceBucket::Raw,
    ];

    /// Fixed probe order for resolving a display name to a provider id.
    /// `raw` first: uploads default to the raw bucket, so most lookups
    /// short-circuit on the first probe.
    pub const LOOKUP_ORDER: [ResourceBucket; 3] = [
        ResourceBucket::Raw,
        ResourceBucket::Image,
        ResourceBucket::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceBucket::Image => "image",
            ResourceBucket::Video => "video",
            ResourceBucket::Raw => "raw",
        }
    }

    pub fn parse(s: &str) -> Option<ResourceBucket> {
        match s.to_lowercase().as_str() {
            "image" => Some(ResourceBucket::Image),
            "video" => Some(ResourceBucket::Video),
            "raw" => Some(ResourceBucket::Raw),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw resource record as returned by the provider.
///
/// Every field is optional and `bytes` / `created_at` are kept as raw JSON
/// values: providers have been seen returning epoch integers, numeric
/// strings, and ISO-8601 strings for the same field, and one malformed
/// record must never fail a whole listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderResource {
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
}

/// Projected view of one stored file.
///
/// Reconstructed from a `ProviderResource` on every listing call; the field
/// names match the JSON shape served by `/api/files`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredFile {
    /// Display name: original filename, falling back to the provider id.
    pub name: String,
    /// Size in bytes; zero when the provider omitted or mangled the field.
    pub size: u64,
    /// `"YYYY-MM-DD HH:MM:SS"` local time, or `"Unknown"`.
    pub modified: String,
    pub size_formatted: String,
    /// Opaque provider identifier used for delete/download calls.
    pub public_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub resource_type: ResourceBucket,
    /// Parsed creation instant. `None` means the provider's timestamp was
    /// missing or unparseable; such records sort last and are excluded from
    /// recency statistics rather than silently becoming "now".
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredFile {
    /// Project a raw provider record into a view. Total: malformed or
    /// missing fields degrade to placeholders, never to an error.
    ///
    /// `queried_bucket` is the bucket the record was listed from; it is the
    /// fallback when the record does not carry its own resource type.
    pub fn project(resource: &ProviderResource, queried_bucket: ResourceBucket) -> StoredFile {
        let public_id = resource
            .public_id
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());

        let name = resource
            .original_filename
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| public_id.clone());

        let size = resource
            .bytes
            .as_ref()
            .and_then(format::json_to_u64)
            .unwrap_or(0);

        let created_at = resource
            .created_at
            .as_ref()
            .and_then(format::parse_timestamp);

        let modified = created_at
            .map(format::format_timestamp)
            .unwrap_or_else(|| "Unknown".to_string());

        let resource_type = resource
            .resource_type
            .as_deref()
            .and_then(ResourceBucket::parse)
            .unwrap_or(queried_bucket);

        StoredFile {
            name,
            size,
            modified,
            size_formatted: format_size(size),
            public_id,
            url: resource.secure_url.clone().or_else(|| resource.url.clone()),
            resource_type,
            created_at,
        }
    }
}

/// Aggregate statistics over the full listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileStats {
    pub total_files: usize,
    /// Human-readable total, e.g. `"12.5 MB"`.
    pub total_size: String,
    pub total_size_bytes: u64,
    /// Uploads whose creation instant falls within the trailing 24 hours.
    /// Records with an unknown timestamp are not counted.
    pub recent_uploads: usize,
}

impl FileStats {
    pub fn from_files(files: &[StoredFile], now: DateTime<Utc>) -> FileStats {
        let total_size_bytes: u64 = files.iter().map(|f| f.size).sum();
        let cutoff = now - chrono::Duration::hours(24);
        let recent_uploads = files
            .iter()
            .filter(|f| f.created_at.is_some_and(|t| t > cutoff))
            .count();

        FileStats {
            total_files: files.len(),
            total_size: format_size(total_size_bytes),
            total_size_bytes,
            recent_uploads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn resource(name: &str, id: &str, bytes: u64, created_at: serde_json::Value) -> ProviderResource {
        ProviderResource {
            public_id: Some(id.to_string()),
            original_filename: Some(name.to_string()),
            bytes: Some(json!(bytes)),
            created_at: Some(created_at),
            secure_url: Some(format!("https://cdn.example.com/{}", id)),
            url: None,
            resource_type: Some("raw".to_string()),
        }
    }

    #[test]
    fn test_project_complete_record() {
        let res = resource("report.pdf", "file_manager/report.pdf", 5_242_880, json!("2024-03-01T10:00:00Z"));
        let file = StoredFile::project(&res, ResourceBucket::Raw);
        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.size, 5_242_880);
        assert_eq!(file.size_formatted, "5.0 MB");
        assert_eq!(file.resource_type, ResourceBucket::Raw);
        assert!(file.created_at.is_some());
        assert_ne!(file.modified, "Unknown");
    }

    #[test]
    fn test_project_is_total_on_empty_record() {
        let file = StoredFile::project(&ProviderResource::default(), ResourceBucket::Image);
        assert_eq!(file.name, "Unknown");
        assert_eq!(file.public_id, "Unknown");
        assert_eq!(file.size, 0);
        assert_eq!(file.size_formatted, "0B");
        assert_eq!(file.modified, "Unknown");
        assert_eq!(file.resource_type, ResourceBucket::Image);
        assert!(file.created_at.is_none());
        assert!(file.url.is_none());
    }

    #[test]
    fn test_project_falls_back_to_public_id() {
        let res = ProviderResource {
            public_id: Some("file_manager/mystery.bin".to_string()),
            ..Default::default()
        };
        let file = StoredFile::project(&res, ResourceBucket::Raw);
        assert_eq!(file.name, "file_manager/mystery.bin");
    }

    #[test]
    fn test_project_malformed_bytes_degrades_to_zero() {
        let res = ProviderResource {
            public_id: Some("x".to_string()),
            bytes: Some(json!("definitely not a number")),
            ..Default::default()
        };
        let file = StoredFile::project(&res, ResourceBucket::Raw);
        assert_eq!(file.size, 0);
    }

    #[test]
    fn test_project_record_bucket_overrides_queried_bucket() {
        let res = ProviderResource {
            public_id: Some("x".to_string()),
            resource_type: Some("video".to_string()),
            ..Default::default()
        };
        let file = StoredFile::project(&res, ResourceBucket::Raw);
        assert_eq!(file.resource_type, ResourceBucket::Video);
    }

    #[test]
    fn test_stats_counts_recent_uploads_only() {
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let recent = now - chrono::Duration::hours(2);
        let old = now - chrono::Duration::hours(48);

        let mut fresh = StoredFile::project(
            &resource("a.txt", "a", 100, json!(recent.timestamp())),
            ResourceBucket::Raw,
        );
        fresh.created_at = Some(recent);
        let mut stale = StoredFile::project(
            &resource("b.txt", "b", 200, json!(old.timestamp())),
            ResourceBucket::Raw,
        );
        stale.created_at = Some(old);
        let mut unknown = StoredFile::project(&ProviderResource::default(), ResourceBucket::Raw);
        unknown.size = 50;

        let stats = FileStats::from_files(&[fresh, stale, unknown], now);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size_bytes, 350);
        assert_eq!(stats.recent_uploads, 1);
    }

    #[test]
    fn test_bucket_roundtrip() {
        for bucket in ResourceBucket::ALL {
            assert_eq!(ResourceBucket::parse(bucket.as_str()), Some(bucket));
        }
        assert_eq!(ResourceBucket::parse("auto"), None);
    }
}
