use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured error payload written by the server and read back by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Human-readable error message
    pub message: Option<String>,
    /// Identifier of the exception type the client should raise
    pub exception_class_name: Option<String>,
}

/// XML view of [`ErrorRecord`]; absent fields are left out instead of written empty
#[derive(Serialize)]
#[serde(rename = "error", rename_all = "camelCase")]
struct XmlErrorRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception_class_name: Option<&'a str>,
}

impl ErrorRecord {
    /// Create a record carrying only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            exception_class_name: None,
        }
    }

    /// Attach the exception type the client should reconstruct
    pub fn with_exception(mut self, kind: impl Into<String>) -> Self {
        self.exception_class_name = Some(kind.into());
        self
    }

    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn from_xml(body: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(body)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_xml(&self) -> Result<String, quick_xml::DeError> {
        quick_xml::se::to_string(&XmlErrorRecord {
            message: self.message.as_deref(),
            exception_class_name: self.exception_class_name.as_deref(),
        })
    }
}
