use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use medinfo_auth::error::AuthError;
use medinfo_db::error::DbError;
use medinfo_intake::error::IntakeError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => {
                tracing::warn!("upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            DbError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenExpired => ApiError::Unauthorized("token expired".to_string()),
            _ => ApiError::Unauthorized("invalid or expired token".to_string()),
        }
    }
}

impl From<IntakeError> for ApiError {
    fn from(e: IntakeError) -> Self {
        match e {
            IntakeError::Invalid(msg) => ApiError::BadRequest(msg),
            IntakeError::DoctorNotFound(_) => ApiError::NotFound("doctor not found".to_string()),
            e @ IntakeError::Analysis(_) => ApiError::BadGateway(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::BadRequest(format!("failed to parse multipart form: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use medinfo_analysis::error::AnalysisError;
    use medinfo_storage::error::StorageError;

    use super::*;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let (status, body) = render(ApiError::Internal("password column missing".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = render(ApiError::BadRequest("invalid userId".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid userId");
    }

    #[test]
    fn db_errors_map_to_statuses() {
        assert!(matches!(
            ApiError::from(DbError::NotFound("item 3".into())),
            ApiError::NotFound(m) if m == "item 3 not found"
        ));
        assert!(matches!(
            ApiError::from(DbError::Conflict("duplicate email".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(DbError::Decode("bad row".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn intake_errors_follow_the_failure_taxonomy() {
        assert!(matches!(
            ApiError::from(IntakeError::Invalid("file is required".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(IntakeError::DoctorNotFound("ghost".into())),
            ApiError::NotFound(m) if m == "doctor not found"
        ));
        assert!(matches!(
            ApiError::from(IntakeError::Analysis(AnalysisError::Timeout("30s".into()))),
            ApiError::BadGateway(m) if m.starts_with("failed to analyze prescription")
        ));
        assert!(matches!(
            ApiError::from(IntakeError::Upload(StorageError::UploadRejected {
                status: 403,
                body: String::new(),
            })),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(IntakeError::SaveItems {
                prescription_id: 1,
                source: DbError::Decode("x".into()),
            }),
            ApiError::Internal(_)
        ));
    }
}
