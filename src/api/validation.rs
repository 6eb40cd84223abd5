//! Rendering of request-validation failures as 400 responses.
//!
//! [`ValidationResponseBuilder`] turns a [`ValidationFailure`] into a [`ValidationResponse`]
//! whose body is an [`ErrorRecord`] in the media type negotiated from `Accept`.
//! [`ValidatedJson`] hooks this into axum: it deserializes a JSON body, runs
//! [`Validate::validate`] and rejects the request with that response on failure.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, Level};

use crate::errors::{negotiate, ErrorRecord, MediaType};
use crate::metrics::registry::VALIDATION_RESPONSES_TOTAL;

const RESPOND_VALIDATION_FAILURE: &str = "Respond ValidationException";

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A request that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    message: String,
    violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Combine field violations; the message lists them in order, comma separated
    pub fn from_violations(violations: Vec<FieldViolation>) -> Self {
        let message = violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            message,
            violations,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

/// Types that can check their own invariants after deserialization
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationFailure>;
}

/// A 400 response carrying an [`ErrorRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    record: ErrorRecord,
    media: MediaType,
}

impl ValidationResponse {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn record(&self) -> &ErrorRecord {
        &self.record
    }

    pub fn media_type(&self) -> MediaType {
        self.media
    }

    pub fn content_type(&self) -> &'static str {
        self.media.as_str()
    }
}

/// Builds the 400 response for a validation failure
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationResponseBuilder;

impl ValidationResponseBuilder {
    /// Logs the full failure at debug level when enabled, otherwise only its
    /// message at info level.
    pub fn build(&self, failure: &ValidationFailure, accept: Option<&str>) -> ValidationResponse {
        if tracing::enabled!(Level::DEBUG) {
            debug!(failure = ?failure, "{}", RESPOND_VALIDATION_FAILURE);
        } else {
            info!(failure = %failure, "{}", RESPOND_VALIDATION_FAILURE);
        }

        let media = negotiate(accept);
        VALIDATION_RESPONSES_TOTAL
            .with_label_values(&[media.label()])
            .inc();

        ValidationResponse {
            record: ErrorRecord::new(failure.to_string()),
            media,
        }
    }
}

impl IntoResponse for ValidationResponse {
    fn into_response(self) -> Response {
        let body = match self.media {
            MediaType::Json => self.record.to_json().map_err(|e| e.to_string()),
            MediaType::Xml => self.record.to_xml().map_err(|e| e.to_string()),
        };

        match body {
            Ok(body) => (
                StatusCode::BAD_REQUEST,
                [(CONTENT_TYPE, self.media.as_str())],
                body,
            )
                .into_response(),
            Err(e) => {
                error!(error = %e, "Failed to render validation error record");
                (
                    StatusCode::BAD_REQUEST,
                    self.record.message.unwrap_or_default(),
                )
                    .into_response()
            }
        }
    }
}

/// Rejection produced by [`ValidatedJson`]
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// Body missing, wrong content type, or not valid JSON for the target type
    Json(JsonRejection),
    /// Body parsed but failed validation
    Invalid(ValidationResponse),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => rejection.into_response(),
            Self::Invalid(response) => response.into_response(),
        }
    }
}

/// JSON body extractor that runs [`Validate`] before the handler sees the value
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let accept = req
            .headers()
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value.validate().map_err(|failure| {
            ValidatedJsonRejection::Invalid(
                ValidationResponseBuilder.build(&failure, accept.as_deref()),
            )
        })?;

        Ok(Self(value))
    }
}
