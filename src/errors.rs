use thiserror::Error;

/// A single S3 control-plane call either fails with a structured service
/// error (machine code plus human message) or with something lower level
/// (connect, timeout, response decode). The reconciler only ever branches
/// on the structured shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum S3OpError {
    #[error("service error ({}): {message}", .code.as_deref().unwrap_or("no code"))]
    Api {
        code: Option<String>,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Couldn't list buckets: {0}")]
    ListBuckets(S3OpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
