use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to open browser session: {0}")]
    SessionError(#[from] fantoccini::error::NewSessionError),

    #[error("Browser command failed: {0}")]
    WebDriverError(#[from] fantoccini::error::CmdError),

    #[error("Cookie {index} is missing required field `{field}`")]
    CredentialError { index: usize, field: &'static str },

    #[error("Store returned its blocking page; service is unavailable, retry later")]
    ServiceUnavailable,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
