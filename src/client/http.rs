use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::mapper::{MapperError, ResponseExceptionMapper};
use super::reconstruct::RemoteException;
use super::registry::ExceptionRegistry;
use crate::config::ClientConfig;
use crate::errors::APPLICATION_JSON;
use crate::metrics::registry::{UPSTREAM_ERRORS_TOTAL, UPSTREAM_REQUESTS_TOTAL};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error payload
    #[error(transparent)]
    Remote(#[from] RemoteException),

    /// The server answered with an error that could not be mapped
    #[error("Failed to map error response: {0}")]
    Mapping(#[from] MapperError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// The remote exception, if the server reported one
    pub fn remote(&self) -> Option<&RemoteException> {
        match self {
            Self::Remote(exception) => Some(exception),
            _ => None,
        }
    }
}

/// JSON HTTP client that turns error responses into [`RemoteException`]s
#[derive(Debug, Clone)]
pub struct ErrorMappingClient {
    base_url: String,
    http_client: reqwest::Client,
    mapper: ResponseExceptionMapper,
}

impl ErrorMappingClient {
    pub fn new(config: &ClientConfig, registry: Arc<ExceptionRegistry>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static(APPLICATION_JSON),
                );
                headers
            })
            .build()?;

        info!(
            "Initialized error-mapping client for {} with {} registered exception types",
            config.base_url,
            registry.len()
        );

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            mapper: ResponseExceptionMapper::new(registry),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.execute("GET", self.http_client.get(url)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        self.execute("POST", self.http_client.post(url).json(body))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        UPSTREAM_REQUESTS_TOTAL.with_label_values(&[method]).inc();

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            UPSTREAM_ERRORS_TOTAL
                .with_label_values(&[&status.as_u16().to_string()])
                .inc();
            let exception = self.mapper.from_response(response).await.map_err(|e| {
                warn!(status = %status.as_u16(), error = %e, "Unmappable error response");
                e
            })?;
            return Err(ClientError::Remote(exception));
        }

        Ok(response.json::<T>().await?)
    }
}
