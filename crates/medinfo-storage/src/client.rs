use crate::error::StorageError;

/// Publishable keys are not JWTs; the storage API rejects them for writes.
const PUBLISHABLE_KEY_PREFIX: &str = "sb_publishable_";

/// Handle to the storage REST API. Cheap to clone; the inner HTTP client
/// shares its connection pool.
#[derive(Clone)]
pub struct StorageClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) service_key: String,
}

impl StorageClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Build a storage client for `base_url` authorized with a service key.
pub fn build_client(base_url: &str, service_key: &str) -> Result<StorageClient, StorageError> {
    if base_url.is_empty() || service_key.is_empty() {
        return Err(StorageError::Config(
            "storage URL and service key are required".to_string(),
        ));
    }
    if service_key.starts_with(PUBLISHABLE_KEY_PREFIX) {
        return Err(StorageError::Config(
            "publishable keys cannot upload; use the service role key".to_string(),
        ));
    }

    let http = reqwest::Client::builder()
        .build()
        .map_err(|e| StorageError::Config(e.to_string()))?;

    Ok(StorageClient {
        http,
        base_url: base_url.trim_end_matches('/').to_string(),
        service_key: service_key.to_string(),
    })
}
