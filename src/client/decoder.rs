use thiserror::Error;
use tracing::{debug, warn};

use super::response::RawResponse;
use crate::errors::{ErrorRecord, MediaType};
use crate::metrics::registry::{ERROR_PAYLOADS_DECODED_TOTAL, ERROR_PAYLOAD_DECODE_FAILURES_TOTAL};

/// Failure to turn an error response into an [`ErrorRecord`]
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Cannot read content of error payload")]
    CannotReadBody(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Unparsable error payload content type: {}", .content_type.as_deref().unwrap_or("<none>"))]
    UnsupportedContentType { content_type: Option<String> },

    #[error("Unparsable json error payload content: {body}")]
    MalformedJson {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unparsable xml error payload content: {body}")]
    MalformedXml {
        body: String,
        #[source]
        source: quick_xml::DeError,
    },
}

impl DecodeError {
    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::CannotReadBody(_) => "unreadable_body",
            Self::UnsupportedContentType { .. } => "unsupported_content_type",
            Self::MalformedJson { .. } => "malformed_json",
            Self::MalformedXml { .. } => "malformed_xml",
        }
    }
}

/// Decode the error payload of a captured response.
///
/// The format is selected by exact comparison of the `Content-Type` header
/// against `application/json` and `application/xml`.
pub fn decode(response: &RawResponse) -> Result<ErrorRecord, DecodeError> {
    let result = decode_body(response);

    if let Err(e) = &result {
        ERROR_PAYLOAD_DECODE_FAILURES_TOTAL
            .with_label_values(&[e.reason()])
            .inc();
        warn!(
            status = %response.status().as_u16(),
            reason = e.reason(),
            "Failed to decode error payload"
        );
    }

    result
}

fn decode_body(response: &RawResponse) -> Result<ErrorRecord, DecodeError> {
    let content_type = response.content_type();
    let media = content_type
        .and_then(MediaType::from_exact)
        .ok_or_else(|| DecodeError::UnsupportedContentType {
            content_type: content_type.map(str::to_string),
        })?;

    let record = match media {
        MediaType::Json => {
            ErrorRecord::from_json(response.body()).map_err(|source| DecodeError::MalformedJson {
                body: response.body_text(),
                source,
            })?
        }
        MediaType::Xml => {
            let body = response.body_text();
            match ErrorRecord::from_xml(&body) {
                Ok(record) => record,
                Err(source) => return Err(DecodeError::MalformedXml { body, source }),
            }
        }
    };

    ERROR_PAYLOADS_DECODED_TOTAL
        .with_label_values(&[media.label()])
        .inc();
    debug!(
        format = media.label(),
        exception = ?record.exception_class_name,
        "Decoded error payload"
    );

    Ok(record)
}
