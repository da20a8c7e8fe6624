/// Unified error types for the face registry
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the registry server and its client flows
#[derive(Error, Debug)]
pub enum FaceError {
    /// The persisted collection exists but could not be read or parsed
    #[error("Storage read error: {0}")]
    StorageRead(String),

    /// The collection could not be rewritten or appended to
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side form validation (no request is sent)
    #[error("{0}")]
    Validation(String),

    /// Server unreachable or responded with an error status
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Camera permission or hardware failure
    #[error("Camera access error: {0}")]
    CameraAccess(String),

    /// Failure inside the recognition capability
    #[error("Recognition error: {0}")]
    Recognition(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error body returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for FaceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FaceError::StorageRead(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error reading database.".to_string(),
            ),
            FaceError::StorageWrite(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error writing to database.".to_string(),
            ),
            FaceError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(), // Don't leak details
            ),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Result type alias for registry operations
pub type FaceResult<T> = Result<T, FaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_storage_errors_do_not_leak_details() {
        let response = FaceError::StorageRead("/var/data/database.json: EACCES".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Error reading database.");
    }

    #[test]
    fn test_write_error_status() {
        let response = FaceError::StorageWrite("disk full".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = FaceError::Validation("Please fill out all fields.".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
