use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::registry::{kinds, ExceptionRegistry};
use super::response::RawResponse;
use crate::errors::ErrorRecord;
use crate::metrics::registry::EXCEPTIONS_RECONSTRUCTED_TOTAL;

/// Message used when the server sent neither a type nor a message
pub const SERVER_ERROR_MESSAGE: &str = "Error from server";

/// Client-side view of an error raised by the server.
///
/// `kind` is the identifier of the type that was actually built, which is the
/// declared supertype when the declared type itself could not be constructed.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct RemoteException {
    kind: String,
    message: String,
    response: Option<RawResponse>,
}

impl RemoteException {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(
        kind: impl Into<String>,
        message: impl Into<String>,
        response: RawResponse,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            response: Some(response),
        }
    }

    /// Generic error used when the server did not name a type
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(kinds::SERVER_ERROR, message)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Original response, for response-carrying types
    pub fn response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(RawResponse::status)
    }
}

/// Why a single construction attempt failed
#[derive(Debug, Error)]
pub enum ConstructError {
    #[error("Unknown exception type: {0}")]
    UnknownType(String),

    #[error("Exception type {name} has no {shape} constructor")]
    MissingConstructor { name: String, shape: &'static str },

    #[error("Exception type {0} has no supertype")]
    NoSupertype(String),

    #[error("Failed to instantiate exception type {name}")]
    Instantiation {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReconstructionError {
    /// Every construction attempt failed for this record
    #[error("Cannot create exception from error record {record:?}")]
    Fatal {
        record: ErrorRecord,
        #[source]
        source: ConstructError,
    },
}

impl ReconstructionError {
    pub fn record(&self) -> &ErrorRecord {
        match self {
            Self::Fatal { record, .. } => record,
        }
    }

    /// Failure of the declared type's own constructor
    pub fn cause(&self) -> &ConstructError {
        match self {
            Self::Fatal { source, .. } => source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Generic,
    Response,
    Message,
    Supertype,
    Fatal,
}

impl Tier {
    fn label(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Response => "response",
            Self::Message => "message",
            Self::Supertype => "supertype",
            Self::Fatal => "fatal",
        }
    }
}

fn record_tier(tier: Tier) {
    EXCEPTIONS_RECONSTRUCTED_TOTAL
        .with_label_values(&[tier.label()])
        .inc();
}

/// Rebuilds [`RemoteException`]s from decoded error records
#[derive(Debug, Clone)]
pub struct ExceptionReconstructor {
    registry: Arc<ExceptionRegistry>,
}

impl ExceptionReconstructor {
    pub fn new(registry: Arc<ExceptionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ExceptionRegistry {
        &self.registry
    }

    /// Build the exception the server asked for.
    ///
    /// Attempts, first success wins:
    /// 1. no type named: generic error with the record message or [`SERVER_ERROR_MESSAGE`]
    /// 2. the named type, from the response if it is response-carrying, else from the message
    /// 3. the named type's direct supertype, from the message
    ///
    /// Fails only when attempt 3 fails; the error carries the attempt 2 failure.
    pub fn reconstruct(
        &self,
        record: &ErrorRecord,
        response: &RawResponse,
    ) -> Result<RemoteException, ReconstructionError> {
        let Some(name) = record.exception_class_name.as_deref() else {
            record_tier(Tier::Generic);
            let message = record
                .message
                .clone()
                .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string());
            return Ok(RemoteException::generic(message));
        };

        let message = record.message.as_deref().unwrap_or("");

        let declared_failure = match self.construct_declared(name, message, response) {
            Ok((exception, tier)) => {
                record_tier(tier);
                debug!(exception = name, tier = tier.label(), "Reconstructed remote exception");
                return Ok(exception);
            }
            Err(e) => e,
        };

        debug!(
            exception = name,
            error = %declared_failure,
            "Falling back to supertype constructor"
        );

        match self.construct_supertype(name, message) {
            Ok(exception) => {
                record_tier(Tier::Supertype);
                debug!(
                    exception = name,
                    built = exception.kind(),
                    "Reconstructed remote exception from supertype"
                );
                Ok(exception)
            }
            Err(fallback_failure) => {
                record_tier(Tier::Fatal);
                warn!(
                    exception = name,
                    error = %declared_failure,
                    fallback_error = %fallback_failure,
                    "Cannot reconstruct remote exception"
                );
                Err(ReconstructionError::Fatal {
                    record: record.clone(),
                    source: declared_failure,
                })
            }
        }
    }

    fn construct_declared(
        &self,
        name: &str,
        message: &str,
        response: &RawResponse,
    ) -> Result<(RemoteException, Tier), ConstructError> {
        let ty = self
            .registry
            .resolve(name)
            .ok_or_else(|| ConstructError::UnknownType(name.to_string()))?;

        if self.registry.is_response_carrying(ty) {
            let constructor =
                ty.from_response()
                    .ok_or_else(|| ConstructError::MissingConstructor {
                        name: name.to_string(),
                        shape: "response",
                    })?;
            let exception = constructor(response).map_err(|source| {
                ConstructError::Instantiation {
                    name: name.to_string(),
                    source,
                }
            })?;
            Ok((exception, Tier::Response))
        } else {
            let exception = construct_from_message(self.registry.as_ref(), name, message)?;
            Ok((exception, Tier::Message))
        }
    }

    fn construct_supertype(
        &self,
        name: &str,
        message: &str,
    ) -> Result<RemoteException, ConstructError> {
        let ty = self
            .registry
            .resolve(name)
            .ok_or_else(|| ConstructError::UnknownType(name.to_string()))?;
        let parent = ty
            .supertype()
            .ok_or_else(|| ConstructError::NoSupertype(name.to_string()))?;

        construct_from_message(self.registry.as_ref(), parent, message)
    }
}

fn construct_from_message(
    registry: &ExceptionRegistry,
    name: &str,
    message: &str,
) -> Result<RemoteException, ConstructError> {
    let ty = registry
        .resolve(name)
        .ok_or_else(|| ConstructError::UnknownType(name.to_string()))?;
    let constructor = ty
        .from_message()
        .ok_or_else(|| ConstructError::MissingConstructor {
            name: name.to_string(),
            shape: "message",
        })?;

    constructor(message).map_err(|source| ConstructError::Instantiation {
        name: name.to_string(),
        source,
    })
}
