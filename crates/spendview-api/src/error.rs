//! Error types for spendview-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use spendview_core::{ErrorCode, ViewError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    View(#[from] ViewError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::View(e) => match e.code() {
                ErrorCode::InvalidSelection => StatusCode::BAD_REQUEST,
                ErrorCode::FetchFailure => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn code(&self) -> String {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND".to_string(),
            ApiError::BadRequest { .. } => "BAD_REQUEST".to_string(),
            ApiError::View(e) => e.code().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!(target: "spendview::api", "{}", self);
        } else {
            log::debug!(target: "spendview::api", "{}", self);
        }

        let mut body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        if let ApiError::View(ref e) = self {
            body["details"] = serde_json::to_value(e.to_details()).unwrap_or_default();
        }

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid = ApiError::from(ViewError::InvalidSelection { employee_id: "e9".to_string() });
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "INVALID_SELECTION");

        let missing = ApiError::NotFound { resource: "/nope".to_string() };
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let bad = ApiError::BadRequest { message: "expected JSON".to_string() };
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let fetch_failure = ApiError::from(ViewError::FetchFailure {
            origin: spendview_core::FetchSource::Feed,
            message: "down".to_string(),
        });
        assert_eq!(fetch_failure.status(), StatusCode::BAD_GATEWAY);
    }
}
