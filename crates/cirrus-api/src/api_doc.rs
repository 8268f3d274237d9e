//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use cirrus_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cirrus API",
        version = "0.1.0",
        description = "Web front end for files stored in a hosted media provider. \
                       Files live only in the provider; every listing is derived fresh."
    ),
    paths(
        handlers::files::list_files,
        handlers::files::list_files_raw,
        handlers::files::stats,
        handlers::health::health_check,
    ),
    components(schemas(
        models::StoredFile,
        models::FileStats,
        models::ResourceBucket,
        handlers::files::RawBucketListing,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "files", description = "File listing and statistics"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
