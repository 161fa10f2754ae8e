use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage config error: {0}")]
    Config(String),

    #[error("storage request failed: {0}")]
    Request(String),

    #[error("upload failed: status={status} body={body}")]
    UploadRejected { status: u16, body: String },
}
