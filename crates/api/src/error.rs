#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Watcher rejected event: {0}")]
    Rejected(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
