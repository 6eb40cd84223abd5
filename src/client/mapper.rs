use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::decoder::{decode, DecodeError};
use super::reconstruct::{ExceptionReconstructor, ReconstructionError, RemoteException};
use super::registry::ExceptionRegistry;
use super::response::RawResponse;

/// Failure to map an error response into a [`RemoteException`]
#[derive(Debug, Error)]
pub enum MapperError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),
}

/// Maps non-2xx responses into the exception the server declared
#[derive(Debug, Clone)]
pub struct ResponseExceptionMapper {
    reconstructor: ExceptionReconstructor,
}

impl ResponseExceptionMapper {
    pub fn new(registry: Arc<ExceptionRegistry>) -> Self {
        Self {
            reconstructor: ExceptionReconstructor::new(registry),
        }
    }

    pub fn reconstructor(&self) -> &ExceptionReconstructor {
        &self.reconstructor
    }

    /// Consume a transport response: read its body once, decode, reconstruct
    pub async fn from_response(
        &self,
        response: reqwest::Response,
    ) -> Result<RemoteException, MapperError> {
        let raw = RawResponse::capture(response).await?;
        self.map_raw(raw)
    }

    /// Map an already captured response
    pub fn map_raw(&self, response: RawResponse) -> Result<RemoteException, MapperError> {
        let record = decode(&response)?;
        let exception = self.reconstructor.reconstruct(&record, &response)?;

        debug!(
            status = %response.status().as_u16(),
            kind = exception.kind(),
            "Mapped error response"
        );

        Ok(exception)
    }
}

impl Default for ResponseExceptionMapper {
    fn default() -> Self {
        Self::new(Arc::new(ExceptionRegistry::with_defaults()))
    }
}
