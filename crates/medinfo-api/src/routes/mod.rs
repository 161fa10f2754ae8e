pub mod auth;
pub mod doctors;
pub mod health;
pub mod items;
pub mod prescriptions;
pub mod users;

use serde::Deserialize;

use crate::error::ApiError;

/// Identifier query parameters. Each route reads the one it needs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdParams {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub doctor_id: Option<String>,
    pub pres_id: Option<String>,
}

/// Parse a required numeric identifier, naming it in the error.
pub(crate) fn required_id(raw: Option<&str>, label: &str) -> Result<i64, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{label} is required")))?;
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid {label}")))
}

/// Run a CPU-heavy password operation off the async workers.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("password task failed: {e}")))
}
