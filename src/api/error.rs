use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::{kinds, ErrorRecord};

/// Handler error rendered as an [`ErrorRecord`] naming the exception type the
/// client should raise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    kind: Option<&'static str>,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: Option<&'static str>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, Some(kinds::NOT_FOUND), message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, Some(kinds::INVALID_STATE), message)
    }

    /// Server error without a declared type; clients see a generic error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, None, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn record(&self) -> ErrorRecord {
        ErrorRecord {
            message: Some(self.message.clone()),
            exception_class_name: self.kind.map(str::to_string),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.record())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_record() {
        let error = ApiError::not_found("Item not found: 42");
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            error.record(),
            ErrorRecord::new("Item not found: 42").with_exception(kinds::NOT_FOUND)
        );
    }

    #[test]
    fn test_internal_has_no_kind() {
        let error = ApiError::internal("boom");
        assert_eq!(error.record().exception_class_name, None);
    }

    #[test]
    fn test_into_response_status_conflict() {
        let response = ApiError::conflict("Item already exists: 1").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
