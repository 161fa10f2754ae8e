use std::time::Duration;

use crate::analyze::default_retry_policy;
use crate::error::AnalysisError;
use crate::retry::RetryPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://rxvalidationai.onrender.com/analyze-prescription";

/// Deadline for a single attempt, covering connect, send and body read.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to the analysis endpoint together with its retry policy.
#[derive(Clone)]
pub struct AnalysisClient {
    pub(crate) http: reqwest::Client,
    pub(crate) endpoint: String,
    pub(crate) retry: RetryPolicy<AnalysisError>,
}

impl AnalysisClient {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn retry_policy(&self) -> &RetryPolicy<AnalysisError> {
        &self.retry
    }
}

/// Build a client with the production timeout and retry policy.
pub fn build_client(endpoint: &str) -> Result<AnalysisClient, AnalysisError> {
    build_client_with(endpoint, ATTEMPT_TIMEOUT, default_retry_policy())
}

/// Build a client with an explicit per-attempt timeout and retry policy.
pub fn build_client_with(
    endpoint: &str,
    attempt_timeout: Duration,
    retry: RetryPolicy<AnalysisError>,
) -> Result<AnalysisClient, AnalysisError> {
    if endpoint.is_empty() {
        return Err(AnalysisError::Config("analysis endpoint is required".to_string()));
    }

    let http = reqwest::Client::builder()
        .timeout(attempt_timeout)
        .build()
        .map_err(|e| AnalysisError::Config(e.to_string()))?;

    Ok(AnalysisClient {
        http,
        endpoint: endpoint.to_string(),
        retry,
    })
}
