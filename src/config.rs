use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("API_PORT must be a valid port number")?,
            // Used only for debugging/observability. Falls back to HOSTNAME when
            // running in a container.
            instance_id: env::var("INSTANCE_ID")
                .or_else(|_| env::var("HOSTNAME"))
                .unwrap_or_else(|_| "unknown".to_string()),
        };

        let client = ClientConfig {
            base_url: env::var("CLIENT_BASE_URL")
                .unwrap_or_else(|_| format!("http://127.0.0.1:{}", server.port)),
            timeout_ms: env::var("CLIENT_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .context("CLIENT_TIMEOUT_MS must be a valid number")?,
            user_agent: env::var("CLIENT_USER_AGENT")
                .unwrap_or_else(|_| format!("rest-error-mapper/{}", env!("CARGO_PKG_VERSION"))),
        };

        Ok(Config { server, client })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
