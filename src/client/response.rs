use axum::body::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

use super::decoder::DecodeError;

/// Snapshot of an HTTP response whose body has been read exactly once.
///
/// Transport bodies are single-read streams, so every consumer (the payload
/// decoder, response-carrying exceptions) works from this copy instead.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Read the full body of a transport response, consuming it
    pub async fn capture(response: reqwest::Response) -> Result<Self, DecodeError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| DecodeError::CannotReadBody(Box::new(e)))?;

        debug!(
            status = %status.as_u16(),
            body_len = body.len(),
            "Captured error response body"
        );

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// First `Content-Type` value, if present and valid visible ASCII
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_content_type_reads_first_value() {
        let mut headers = HeaderMap::new();
        headers.append(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        headers.append(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = RawResponse::new(StatusCode::BAD_REQUEST, headers, "<error/>");

        assert_eq!(response.content_type(), Some("application/xml"));
    }

    #[test]
    fn test_content_type_missing() {
        let response = RawResponse::new(StatusCode::NOT_FOUND, HeaderMap::new(), "");
        assert_eq!(response.content_type(), None);
    }

    #[tokio::test]
    async fn test_capture_reads_status_headers_and_body() {
        let http_response = axum::http::Response::builder()
            .status(StatusCode::CONFLICT)
            .header(CONTENT_TYPE, "application/json")
            .body(r#"{"message":"taken"}"#.to_string())
            .unwrap();

        let captured = RawResponse::capture(reqwest::Response::from(http_response))
            .await
            .unwrap();

        assert_eq!(captured.status(), StatusCode::CONFLICT);
        assert_eq!(captured.content_type(), Some("application/json"));
        assert_eq!(captured.body_text(), r#"{"message":"taken"}"#);
    }

    #[tokio::test]
    async fn test_capture_reports_unreadable_body() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"mess")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )),
        ];
        let body = reqwest::Body::wrap_stream(futures::stream::iter(chunks));
        let http_response = axum::http::Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();

        let err = RawResponse::capture(reqwest::Response::from(http_response))
            .await
            .unwrap_err();

        assert!(matches!(err, DecodeError::CannotReadBody(_)));
    }
}
