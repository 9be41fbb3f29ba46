use thiserror::Error;

/// Failure reported by an external collaborator (object storage or notifications).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("event does not describe an S3 object: {0}")]
    InvalidEvent(&'static str),
    #[error("failed to fetch {bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: ServiceError,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode resized image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to store {bucket}/{key}: {source}")]
    Store {
        bucket: String,
        key: String,
        #[source]
        source: ServiceError,
    },
    #[error("failed to publish notification: {0}")]
    Notify(#[source] ServiceError),
    #[error("image worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T, E = ResizeError> = std::result::Result<T, E>;
