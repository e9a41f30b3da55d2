use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use models::errors::FieldError;
use service::errors::ServiceError;

/// JSON error envelope returned by every failing route.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: Option<String>,
    pub fields: Option<Vec<FieldError>>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: Option<String>) -> Self {
        Self { status, error, detail, fields: None }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.error,
            "detail": self.detail,
            "fields": self.fields,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(v) => {
                let detail = v.to_string();
                Self {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    error: "Validation Error",
                    detail: Some(detail),
                    fields: Some(v.fields),
                }
            }
            ServiceError::NotFound { message, .. } => {
                Self::new(StatusCode::NOT_FOUND, "Not Found", Some(message))
            }
            ServiceError::Unavailable(msg) => {
                error!(error = %msg, "store unavailable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Store Unavailable", Some(msg))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Connection(#[from] models::store::ConnectionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
