use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API request failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("API returned unexpected status {0}")]
    HttpStatus(u16),

    #[error("API returned invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected API response shape: {0}")]
    Shape(String),

    #[error("Missing key \"{0}\" in API response")]
    MissingKey(&'static str),

    #[error("Unknown homework status \"{0}\"")]
    UnknownStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification delivery failed: {0}")]
    Notify(String),
}

impl AppError {
    /// Network-level and non-200 failures; the loop retries these with the same cursor.
    pub fn is_connection(&self) -> bool {
        matches!(self, AppError::Connection(_) | AppError::HttpStatus(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
