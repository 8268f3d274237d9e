//! Configuration module
//!
//! Everything is sourced from environment variables (plus an optional
//! `.env` file) with sane defaults for local development. Provider
//! credentials are the only hard requirement.

use std::env;

use crate::models::ResourceBucket;

// Common constants
const HTTP_TIMEOUT_SECS: u64 = 30;
const SIGNED_URL_TTL_SECS: u64 = 3600;
const LIST_MAX_RESULTS: u32 = 100;
const STATS_MAX_RESULTS: u32 = 1000;
const MAX_FILE_SIZE_MB: usize = 100;

const DEFAULT_ALLOWED_EXTENSIONS: &str =
    "txt,pdf,png,jpg,jpeg,gif,doc,docx,xls,xlsx,zip,rar,mp3,mp4,avi,mov";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Provider credentials
    pub provider_cloud_name: String,
    pub provider_api_key: String,
    pub provider_api_secret: String,
    /// Override for the provider API endpoint. Mainly for tests; defaults
    /// to the hosted service when unset.
    pub provider_api_base: Option<String>,
    // Storage layout
    pub storage_folder: String,
    pub upload_bucket: ResourceBucket,
    // Upload policy
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    // Listing behavior
    pub list_max_results: u32,
    pub stats_max_results: u32,
    // HTTP client behavior
    pub http_timeout_secs: u64,
    pub signed_url_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let upload_bucket = env::var("UPLOAD_RESOURCE_TYPE")
            .ok()
            .as_deref()
            .and_then(ResourceBucket::parse)
            .unwrap_or(ResourceBucket::Raw);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            provider_cloud_name: env::var("CLOUD_NAME")
                .map_err(|_| anyhow::anyhow!("CLOUD_NAME must be set"))?,
            provider_api_key: env::var("PROVIDER_API_KEY")
                .map_err(|_| anyhow::anyhow!("PROVIDER_API_KEY must be set"))?,
            provider_api_secret: env::var("PROVIDER_API_SECRET")
                .map_err(|_| anyhow::anyhow!("PROVIDER_API_SECRET must be set"))?,
            provider_api_base: env::var("PROVIDER_API_BASE").ok().filter(|s| !s.is_empty()),
            storage_folder: env::var("STORAGE_FOLDER")
                .unwrap_or_else(|_| "file_manager".to_string()),
            upload_bucket,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            list_max_results: env::var("LIST_MAX_RESULTS")
                .unwrap_or_else(|_| LIST_MAX_RESULTS.to_string())
                .parse()
                .unwrap_or(LIST_MAX_RESULTS),
            stats_max_results: env::var("STATS_MAX_RESULTS")
                .unwrap_or_else(|_| STATS_MAX_RESULTS.to_string())
                .parse()
                .unwrap_or(STATS_MAX_RESULTS),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(SIGNED_URL_TTL_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.provider_cloud_name.trim().is_empty() {
            return Err(anyhow::anyhow!("CLOUD_NAME cannot be empty"));
        }

        if self.provider_api_key.trim().is_empty()
            || self.provider_api_secret.trim().is_empty()
        {
            return Err(anyhow::anyhow!(
                "PROVIDER_API_KEY and PROVIDER_API_SECRET cannot be empty"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS cannot be empty"));
        }

        if let Some(base) = &self.provider_api_base {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "PROVIDER_API_BASE must be an http(s) URL"
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            provider_cloud_name: "demo".to_string(),
            provider_api_key: "key".to_string(),
            provider_api_secret: "secret".to_string(),
            provider_api_base: None,
            storage_folder: "file_manager".to_string(),
            upload_bucket: ResourceBucket::Raw,
            max_file_size_bytes: 100 * 1024 * 1024,
            allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
            list_max_results: 100,
            stats_max_results: 1000,
            http_timeout_secs: 30,
            signed_url_ttl_secs: 3600,
        }
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let mut config = sample_config();
        config.provider_api_secret = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_api_base() {
        let mut config = sample_config();
        config.provider_api_base = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = sample_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
        config.environment = "prod".to_string();
        assert!(config.is_production());
    }
}
