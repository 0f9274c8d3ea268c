use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use credit_core::CreditError;
use serde::Serialize;

/// Envelope for every JSON route.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a pipeline failure.
pub fn status_for(error: &CreditError) -> StatusCode {
    match error {
        CreditError::NotFound(_) => StatusCode::NOT_FOUND,
        CreditError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CreditError::ApiError(_) | CreditError::InvalidData(_) | CreditError::NarrativeError(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

/// Error returned by JSON handlers.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<CreditError> for AppError {
    fn from(e: CreditError) -> Self {
        Self {
            status: status_for(&e),
            message: e.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        } else {
            tracing::debug!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(ApiResponse::error(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&CreditError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&CreditError::ApiError("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&CreditError::ConfigError("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::error("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "error": "boom"}));
        let body = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": 1}));
    }
}
