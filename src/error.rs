use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything that can fail between receiving a reading and answering it.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Malformed or out-of-range request field. The caller can fix this.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Artifacts are not loaded; the process is up but cannot predict.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Assembled vector disagrees with the scaler/model column schema.
    /// A deployment fault, not something the caller caused.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    /// Unexpected inference failure. Detail is logged, never returned.
    #[error("internal error")]
    Internal(String),
}

impl PredictError {
    fn status(&self) -> StatusCode {
        match self {
            PredictError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PredictError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            PredictError::SchemaMismatch(_) | PredictError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        if let PredictError::Internal(detail) = &self {
            tracing::error!("inference fault: {detail}");
        }
        if let PredictError::SchemaMismatch(detail) = &self {
            tracing::error!("schema mismatch reached a request handler: {detail}");
        }
        // `Display` for Internal carries no detail, so the body stays opaque.
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_per_variant() {
        assert_eq!(
            PredictError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PredictError::ServiceUnavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            PredictError::SchemaMismatch("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PredictError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_display_is_opaque() {
        let err = PredictError::Internal("tree 3 walked off the schema".into());
        assert_eq!(err.to_string(), "internal error");
    }
}
