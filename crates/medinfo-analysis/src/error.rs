use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request timed out: {0}")]
    Timeout(String),

    #[error("failed to call analysis service: {0}")]
    Http(String),

    #[error("analysis service error: status={status} body={body}")]
    Upstream { status: u16, body: String },

    #[error("failed to decode analysis response: {0}")]
    ResponseParse(String),

    #[error("failed to call analysis service after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<AnalysisError>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("analysis client config error: {0}")]
    Config(String),
}
