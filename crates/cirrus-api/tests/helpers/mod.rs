//! Test helpers: in-memory provider and test server construction.
//!
//! Run from workspace root: `cargo test -p cirrus-api`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use chrono::Utc;
use serde_json::json;

use cirrus_api::setup::routes::setup_routes;
use cirrus_api::state::AppState;
use cirrus_core::models::{ProviderResource, ResourceBucket};
use cirrus_core::Config;
use cirrus_provider::{DestroyOutcome, Provider, ProviderError, ProviderResult};

#[derive(Clone)]
pub struct StoredEntry {
    pub bucket: ResourceBucket,
    pub resource: ProviderResource,
    pub data: Vec<u8>,
}

/// In-memory provider standing in for the hosted service. Records upload
/// call counts so tests can assert that rejected requests never reach it.
#[derive(Default)]
pub struct RecordingProvider {
    pub entries: Mutex<Vec<StoredEntry>>,
    pub upload_calls: AtomicUsize,
    pub fail_all: AtomicBool,
}

impl RecordingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, bucket: ResourceBucket, name: &str, bytes: u64) {
        let resource = ProviderResource {
            public_id: Some(format!("file_manager/{}", name)),
            original_filename: Some(name.to_string()),
            bytes: Some(json!(bytes)),
            created_at: Some(json!(Utc::now().to_rfc3339())),
            secure_url: Some(format!("https://cdn.test/{}", name)),
            ..Default::default()
        };
        self.entries.lock().unwrap().push(StoredEntry {
            bucket,
            resource,
            data: vec![0; bytes as usize],
        });
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail_all.store(unavailable, Ordering::SeqCst);
    }

    pub fn names(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.resource.original_filename.clone())
            .collect()
    }

    fn check_available(&self) -> ProviderResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            Err(ProviderError::ListFailed("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    async fn list(
        &self,
        bucket: ResourceBucket,
        _max_results: u32,
    ) -> ProviderResult<Vec<ProviderResource>> {
        self.check_available()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.bucket == bucket)
            .map(|e| e.resource.clone())
            .collect())
    }

    async fn upload(
        &self,
        bucket: ResourceBucket,
        public_id: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> ProviderResult<ProviderResource> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()
            .map_err(|_| ProviderError::UploadFailed("connection refused".to_string()))?;

        let resource = ProviderResource {
            public_id: Some(public_id.to_string()),
            original_filename: Some(filename.to_string()),
            bytes: Some(json!(data.len())),
            created_at: Some(json!(Utc::now().to_rfc3339())),
            secure_url: Some(format!("https://cdn.test/{}", public_id)),
            resource_type: Some(bucket.as_str().to_string()),
            ..Default::default()
        };
        self.entries.lock().unwrap().push(StoredEntry {
            bucket,
            resource: resource.clone(),
            data,
        });
        Ok(resource)
    }

    async fn destroy(
        &self,
        bucket: ResourceBucket,
        public_id: &str,
    ) -> ProviderResult<DestroyOutcome> {
        self.check_available()
            .map_err(|_| ProviderError::DeleteFailed("connection refused".to_string()))?;

        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| {
            !(e.bucket == bucket && e.resource.public_id.as_deref() == Some(public_id))
        });
        if entries.len() < before {
            Ok(DestroyOutcome::Deleted)
        } else {
            Ok(DestroyOutcome::NotFound)
        }
    }

    fn signed_download_url(&self, bucket: ResourceBucket, public_id: &str) -> String {
        format!("https://cdn.test/signed/{}/{}", bucket, public_id)
    }

    async fn fetch(&self, bucket: ResourceBucket, public_id: &str) -> ProviderResult<Bytes> {
        self.check_available()
            .map_err(|_| ProviderError::BadResponse("connection refused".to_string()))?;

        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.bucket == bucket && e.resource.public_id.as_deref() == Some(public_id))
            .map(|e| Bytes::from(e.data.clone()))
            .ok_or_else(|| ProviderError::NotFound(public_id.to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        provider_cloud_name: "demo".to_string(),
        provider_api_key: "key".to_string(),
        provider_api_secret: "secret".to_string(),
        provider_api_base: None,
        storage_folder: "file_manager".to_string(),
        upload_bucket: ResourceBucket::Raw,
        max_file_size_bytes: 100 * 1024 * 1024,
        allowed_extensions: vec![
            "txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "xls", "xlsx", "zip",
            "rar", "mp3", "mp4", "avi", "mov",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        list_max_results: 100,
        stats_max_results: 1000,
        http_timeout_secs: 5,
        signed_url_ttl_secs: 3600,
    }
}

pub fn test_server(provider: Arc<RecordingProvider>) -> TestServer {
    let config = test_config();
    let state = AppState::new(config.clone(), provider);
    let router = setup_routes(&config, state).expect("router setup");
    TestServer::new(router).expect("test server")
}
