/// Errors produced by the fetch, cache and store layers
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No request in a batch of {attempted} produced a usable response")]
    Aggregate { attempted: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the transport could not obtain bytes
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::HttpClient(_))
    }

    /// True when bytes were obtained but did not match the expected schema
    pub fn is_decode(&self) -> bool {
        matches!(self, AppError::Decode(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
