use thiserror::Error;

/// Application-wide error types for joblink.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a posting page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Configuration document missing or malformed.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Writing to the tracking sheet failed.
    #[error("Sheet error: {0}")]
    SinkError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error came from fetching a page.
    ///
    /// Fetch failures are recovered locally: the pipeline downgrades them to
    /// empty metadata instead of aborting record creation.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::Timeout(_) | AppError::NetworkError(_)
        )
    }

    /// Name of the stage that produced this error, for user-facing reports.
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::HttpError(_) | AppError::Timeout(_) | AppError::NetworkError(_) => "fetch",
            AppError::ConfigError(_) => "config",
            AppError::SinkError(_) => "sheet",
            AppError::SerializationError(_) => "serialization",
            AppError::Generic(_) => "general",
        }
    }
}
