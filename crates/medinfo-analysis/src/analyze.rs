use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::info;

use medinfo_core::models::analysis::AnalysisResult;

use crate::client::AnalysisClient;
use crate::error::AnalysisError;
use crate::retry::{RetryError, RetryPolicy};

pub const MAX_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Request body for the analysis endpoint.
#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    file: String,
    symptoms: &'a str,
    doctor_speciality: &'a str,
}

/// Three attempts, five seconds apart, retrying only timeouts and
/// gateway-class statuses.
pub fn default_retry_policy() -> RetryPolicy<AnalysisError> {
    RetryPolicy {
        max_attempts: MAX_ATTEMPTS,
        delay: RETRY_DELAY,
        is_retryable: is_retryable_error,
    }
}

/// Timeouts and 502/503/504 are transient. Everything else, including other
/// 5xx statuses, connection failures and malformed bodies, is not.
pub fn is_retryable_error(e: &AnalysisError) -> bool {
    match e {
        AnalysisError::Timeout(_) => true,
        AnalysisError::Upstream { status, .. } => matches!(status, 502..=504),
        _ => false,
    }
}

/// Send an image and its context to the analysis service.
///
/// The image travels base64-encoded inside a JSON body. On success every
/// finding's name is overwritten with its map key.
pub async fn analyze_prescription(
    client: &AnalysisClient,
    image: &[u8],
    symptoms: &str,
    doctor_speciality: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let body = AnalyzeRequest {
        file: BASE64.encode(image),
        symptoms,
        doctor_speciality,
    };
    let payload = serde_json::to_vec(&body)?;
    let payload = payload.as_slice();

    let outcome = client
        .retry
        .run(|attempt| send_once(client, payload, attempt))
        .await;

    match outcome {
        Ok(mut result) => {
            result.backfill_names();
            info!(
                tests = result.tests.len(),
                medicines = result.medicines.len(),
                "prescription analysis complete"
            );
            Ok(result)
        }
        Err(RetryError::Terminal(e)) => Err(e),
        Err(RetryError::Exhausted { attempts, last }) => Err(AnalysisError::RetriesExhausted {
            attempts,
            source: Box::new(last),
        }),
    }
}

async fn send_once(
    client: &AnalysisClient,
    payload: &[u8],
    attempt: u32,
) -> Result<AnalysisResult, AnalysisError> {
    info!(attempt, endpoint = %client.endpoint, "calling analysis service");

    let resp = client
        .http
        .post(&client.endpoint)
        .header(CONTENT_TYPE, "application/json")
        .body(payload.to_vec())
        .send()
        .await
        .map_err(classify_transport_error)?;

    let status = resp.status();
    if status != StatusCode::OK {
        let body = resp.text().await.unwrap_or_default();
        return Err(AnalysisError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await.map_err(classify_transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| AnalysisError::ResponseParse(e.to_string()))
}

fn classify_transport_error(e: reqwest::Error) -> AnalysisError {
    if e.is_timeout() {
        AnalysisError::Timeout(e.to_string())
    } else {
        AnalysisError::Http(e.to_string())
    }
}
