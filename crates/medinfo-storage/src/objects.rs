use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::info;

use medinfo_core::object_keys;

use crate::client::StorageClient;
use crate::error::StorageError;

/// Upload an object with a single PUT and return its public URL.
///
/// Any status other than 200, 201 or 204 is an error; nothing is retried
/// here. The public URL is derived from the bucket and key without a second
/// request, so the bucket is assumed to be public-read.
pub async fn upload_object(
    client: &StorageClient,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
) -> Result<String, StorageError> {
    let url = object_keys::upload_url(&client.base_url, bucket, key);
    let size = body.len();

    let mut req = client
        .http
        .put(&url)
        .header(AUTHORIZATION, format!("Bearer {}", client.service_key))
        .header("apikey", &client.service_key)
        .header(CACHE_CONTROL, "no-cache")
        .body(body);

    if let Some(ct) = content_type.filter(|ct| !ct.is_empty()) {
        req = req.header(CONTENT_TYPE, ct);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| StorageError::Request(e.to_string()))?;

    let status = resp.status();
    if !matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
    ) {
        let body = resp.text().await.unwrap_or_default();
        return Err(StorageError::UploadRejected {
            status: status.as_u16(),
            body,
        });
    }

    info!(bucket, key, size, "object uploaded");
    Ok(object_keys::public_url(&client.base_url, bucket, key))
}
