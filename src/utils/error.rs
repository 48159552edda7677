use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Request body too large, max allowed: {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl DiagnosisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DiagnosisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DiagnosisError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            DiagnosisError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            DiagnosisError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DiagnosisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });

        if status.is_client_error() {
            tracing::warn!("Request rejected: {} ({})", self, status);
        } else {
            tracing::error!("Request failed: {} ({})", self, status);
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn invalid_input_is_bad_request() {
        let err = DiagnosisError::InvalidInput("No image uploaded".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn processing_failures_are_server_errors() {
        let io = DiagnosisError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let inference = DiagnosisError::Inference("empty output".to_string());
        assert_eq!(inference.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn transport_limits_keep_their_status() {
        assert_eq!(DiagnosisError::Timeout(60).status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            DiagnosisError::PayloadTooLarge(1024).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[tokio::test]
    async fn response_body_carries_error_message() {
        let response =
            DiagnosisError::InvalidInput("No image uploaded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "No image uploaded" }));
    }
}
