use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type MemoResult<T> = Result<T, MemoError>;

impl From<MemoError> for credit_core::CreditError {
    fn from(e: MemoError) -> Self {
        credit_core::CreditError::NarrativeError(e.to_string())
    }
}
