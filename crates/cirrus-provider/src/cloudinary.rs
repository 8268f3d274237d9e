//! Cloudinary-compatible HTTP provider
//!
//! Implements [`Provider`] against the hosted media API. Read calls use
//! basic auth; write calls carry a request signature (see [`crate::sign`]).
//! The API base is configurable so tests can point the client at a local
//! mock server.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::{debug, warn};

use cirrus_core::models::{ProviderResource, ResourceBucket};
use cirrus_core::Config;

use crate::sign::sign_request;
use crate::traits::{DestroyOutcome, Provider, ProviderError, ProviderResult};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    resources: Vec<ProviderResource>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// HTTP client for the hosted media provider.
pub struct CloudinaryClient {
    http_client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    signed_url_ttl_secs: u64,
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("cloud_name", &self.cloud_name)
            .field("folder", &self.folder)
            .finish()
    }
}

impl CloudinaryClient {
    pub fn new(config: &Config) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        let api_base = config
            .provider_api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            cloud_name: config.provider_cloud_name.clone(),
            api_key: config.provider_api_key.clone(),
            api_secret: config.provider_api_secret.clone(),
            folder: config.storage_folder.clone(),
            signed_url_ttl_secs: config.signed_url_ttl_secs,
        })
    }

    fn resources_url(&self, bucket: ResourceBucket) -> String {
        format!(
            "{}/{}/resources/{}/upload",
            self.api_base, self.cloud_name, bucket
        )
    }

    fn upload_url(&self, bucket: ResourceBucket) -> String {
        format!("{}/{}/{}/upload", self.api_base, self.cloud_name, bucket)
    }

    fn destroy_url(&self, bucket: ResourceBucket) -> String {
        format!("{}/{}/{}/destroy", self.api_base, self.cloud_name, bucket)
    }

    async fn error_body(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(200).collect();
        format!("status {}: {}", status, snippet)
    }
}

#[async_trait]
impl Provider for CloudinaryClient {
    async fn list(
        &self,
        bucket: ResourceBucket,
        max_results: u32,
    ) -> ProviderResult<Vec<ProviderResource>> {
        let prefix = format!("{}/", self.folder);
        debug!(bucket = %bucket, max_results, "listing provider resources");

        let response = self
            .http_client
            .get(self.resources_url(bucket))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&[
                ("prefix", prefix.as_str()),
                ("max_results", &max_results.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::ListFailed(Self::error_body(response).await));
        }

        let parsed: ListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::BadResponse(format!("invalid listing body: {}", e)))?;

        Ok(parsed.resources)
    }

    async fn upload(
        &self,
        bucket: ResourceBucket,
        public_id: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> ProviderResult<ProviderResource> {
        let timestamp = Utc::now().timestamp().to_string();
        // overwrite=false makes a collision a provider-side error instead of
        // a silent replacement. The id is resolved before this call, so a
        // failure here means a concurrent writer won the name.
        let signed_params = [
            ("overwrite", "false".to_string()),
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = sign_request(&signed_params, &self.api_secret);

        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| ProviderError::UploadFailed(format!("invalid file part: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("overwrite", "false")
            .text("timestamp", timestamp)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .part("file", file_part);

        debug!(bucket = %bucket, public_id, "uploading to provider");

        let response = self
            .http_client
            .post(self.upload_url(bucket))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_body(response).await;
            warn!(public_id, %detail, "provider rejected upload");
            return Err(ProviderError::UploadFailed(detail));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::BadResponse(format!("invalid upload body: {}", e)))
    }

    async fn destroy(
        &self,
        bucket: ResourceBucket,
        public_id: &str,
    ) -> ProviderResult<DestroyOutcome> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed_params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = sign_request(&signed_params, &self.api_secret);

        debug!(bucket = %bucket, public_id, "destroying provider resource");

        let response = self
            .http_client
            .post(self.destroy_url(bucket))
            .form(&[
                ("public_id", public_id),
                ("timestamp", &timestamp),
                ("api_key", &self.api_key),
                ("signature", &signature),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::DeleteFailed(
                Self::error_body(response).await,
            ));
        }

        let parsed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::BadResponse(format!("invalid destroy body: {}", e)))?;

        match parsed.result.as_str() {
            "ok" => Ok(DestroyOutcome::Deleted),
            "not found" => Ok(DestroyOutcome::NotFound),
            other => Err(ProviderError::BadResponse(format!(
                "unexpected destroy result: {}",
                other
            ))),
        }
    }

    fn signed_download_url(&self, bucket: ResourceBucket, public_id: &str) -> String {
        let expires_at = (Utc::now().timestamp() as u64 + self.signed_url_ttl_secs).to_string();
        let signed_params = [
            ("expires_at", expires_at.clone()),
            ("public_id", public_id.to_string()),
        ];
        let signature = sign_request(&signed_params, &self.api_secret);

        format!(
            "{}/{}/{}/download?public_id={}&expires_at={}&api_key={}&signature={}",
            self.api_base,
            self.cloud_name,
            bucket,
            utf8_percent_encode(public_id, NON_ALPHANUMERIC),
            expires_at,
            self.api_key,
            signature
        )
    }

    async fn fetch(&self, bucket: ResourceBucket, public_id: &str) -> ProviderResult<Bytes> {
        let url = self.signed_download_url(bucket, public_id);
        let response = self.http_client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(public_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(ProviderError::BadResponse(
                Self::error_body(response).await,
            ));
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_base: &str) -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            provider_cloud_name: "demo".to_string(),
            provider_api_key: "key123".to_string(),
            provider_api_secret: "secret456".to_string(),
            provider_api_base: Some(api_base.to_string()),
            storage_folder: "file_manager".to_string(),
            upload_bucket: ResourceBucket::Raw,
            max_file_size_bytes: 100 * 1024 * 1024,
            allowed_extensions: vec!["pdf".to_string()],
            list_max_results: 100,
            stats_max_results: 1000,
            http_timeout_secs: 5,
            signed_url_ttl_secs: 3600,
        }
    }

    #[tokio::test]
    async fn test_list_parses_resources() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/demo/resources/raw/upload")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("prefix".into(), "file_manager/".into()),
                mockito::Matcher::UrlEncoded("max_results".into(), "100".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"resources":[
                    {"public_id":"file_manager/report.pdf","bytes":5242880,
                     "created_at":"2024-01-15T10:30:00Z","resource_type":"raw"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = CloudinaryClient::new(&test_config(&server.url())).unwrap();
        let resources = client.list(ResourceBucket::Raw, 100).await.unwrap();

        mock.assert_async().await;
        assert_eq!(resources.len(), 1);
        assert_eq!(
            resources[0].public_id.as_deref(),
            Some("file_manager/report.pdf")
        );
    }

    #[tokio::test]
    async fn test_list_error_status_is_list_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/demo/resources/raw/upload")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":{"message":"invalid credentials"}}"#)
            .create_async()
            .await;

        let client = CloudinaryClient::new(&test_config(&server.url())).unwrap();
        let err = client.list(ResourceBucket::Raw, 100).await.unwrap_err();
        assert!(matches!(err, ProviderError::ListFailed(_)));
    }

    #[tokio::test]
    async fn test_upload_returns_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/demo/raw/upload")
            .with_status(200)
            .with_body(
                r#"{"public_id":"file_manager/report.pdf","bytes":11,
                    "created_at":"2024-01-15T10:30:00Z","resource_type":"raw",
                    "original_filename":"report"}"#,
            )
            .create_async()
            .await;

        let client = CloudinaryClient::new(&test_config(&server.url())).unwrap();
        let record = client
            .upload(
                ResourceBucket::Raw,
                "file_manager/report.pdf",
                "report.pdf",
                b"hello world".to_vec(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(record.public_id.as_deref(), Some("file_manager/report.pdf"));
    }

    #[tokio::test]
    async fn test_destroy_ok_and_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/demo/raw/destroy")
            .with_status(200)
            .with_body(r#"{"result":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = CloudinaryClient::new(&test_config(&server.url())).unwrap();
        let outcome = client
            .destroy(ResourceBucket::Raw, "file_manager/report.pdf")
            .await
            .unwrap();
        assert_eq!(outcome, DestroyOutcome::Deleted);

        server
            .mock("POST", "/demo/raw/destroy")
            .with_status(200)
            .with_body(r#"{"result":"not found"}"#)
            .create_async()
            .await;

        let outcome = client
            .destroy(ResourceBucket::Raw, "file_manager/ghost.pdf")
            .await
            .unwrap();
        assert_eq!(outcome, DestroyOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_streams_bytes_and_maps_404() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex("^/demo/raw/download".into()))
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("file-bytes")
            .create_async()
            .await;

        let client = CloudinaryClient::new(&test_config(&server.url())).unwrap();
        let bytes = client
            .fetch(ResourceBucket::Raw, "file_manager/report.pdf")
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"file-bytes");

        let mut missing_server = mockito::Server::new_async().await;
        missing_server
            .mock("GET", mockito::Matcher::Regex("^/demo/raw/download".into()))
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = CloudinaryClient::new(&test_config(&missing_server.url())).unwrap();
        let err = client
            .fetch(ResourceBucket::Raw, "file_manager/ghost.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn test_signed_download_url_shape() {
        let config = test_config("https://api.example.com");
        let client = CloudinaryClient::new(&config).unwrap();
        let url = client.signed_download_url(ResourceBucket::Raw, "file_manager/a b.pdf");
        assert!(url.starts_with("https://api.example.com/demo/raw/download?"));
        assert!(url.contains("public_id=file%5Fmanager%2Fa%20b%2Epdf"));
        assert!(url.contains("signature="));
        assert!(url.contains("expires_at="));
    }
}
