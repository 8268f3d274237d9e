//! Application state
//!
//! One state object shared by all handlers. There is no database: the
//! provider is the source of truth and the catalog re-derives every view
//! from it per request.

use std::sync::Arc;

use cirrus_core::{Config, UploadValidator};
use cirrus_provider::Provider;

use crate::services::catalog::FileCatalog;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn Provider>,
    pub catalog: FileCatalog,
    pub validator: Arc<UploadValidator>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn Provider>) -> Self {
        let catalog = FileCatalog::new(
            provider.clone(),
            config.storage_folder.clone(),
            config.list_max_results,
            config.stats_max_results,
        );
        let validator = Arc::new(UploadValidator::new(
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
        ));

        Self {
            config,
            provider,
            catalog,
            validator,
        }
    }
}
