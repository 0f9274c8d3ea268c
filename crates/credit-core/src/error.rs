use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreditError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("No data: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Narrative error: {0}")]
    NarrativeError(String),
}

impl CreditError {
    /// True when the provider answered but had nothing for the symbol.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CreditError::NotFound(_))
    }
}
