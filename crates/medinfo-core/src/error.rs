use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid item type: {0}")]
    InvalidItemType(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),
}
