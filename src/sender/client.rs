use crate::domain::QuarantineRequest;
use reqwest::{Client, ClientBuilder};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/get-and-quarantine";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Request timeout: {0}")]
    RequestTimeout(String),
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("quarantine-relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: Duration,
}

/// Seam between the dispatcher and the decision service.
pub trait QuarantineApi: Send + Sync {
    /// Issue exactly one quarantine call; `Ok` carries the 2xx status code.
    fn quarantine(
        &self,
        request: &QuarantineRequest,
    ) -> impl Future<Output = Result<u16, ClientError>> + Send;

    fn endpoint(&self) -> &str;
}

#[derive(Debug)]
pub struct ClientStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_response_time: AtomicU64,
}

impl ClientStats {
    fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            total_response_time: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self, success: bool, response_time: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time
            .fetch_add(response_time.as_millis() as u64, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// HTTP client for the quarantine decision service.
///
/// Sends a single JSON POST per request with no retries. The whole exchange,
/// connect included, is bounded by `ClientConfig::timeout`.
#[derive(Debug, Clone)]
pub struct QuarantineClient {
    client: Client,
    config: ClientConfig,
    api_url: Url,
    stats: Arc<ClientStats>,
}

impl QuarantineClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let api_url: Url = config
            .api_url
            .parse()
            .map_err(|e| ClientError::InvalidConfiguration(format!("Invalid API URL: {e}")))?;

        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfiguration(format!(
                "Unsupported API URL scheme: {}",
                api_url.scheme()
            )));
        }

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ClientError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            api_url,
            stats: Arc::new(ClientStats::new()),
        })
    }

    async fn post(&self, request: &QuarantineRequest) -> Result<u16, ClientError> {
        let response = timeout(
            self.config.timeout,
            self.client.post(self.api_url.clone()).json(request).send(),
        )
        .await
        .map_err(|_| {
            ClientError::RequestTimeout(format!(
                "no response within {}s",
                self.config.timeout.as_secs_f64()
            ))
        })?
        .map_err(|e| {
            if e.is_timeout() {
                ClientError::RequestTimeout(e.to_string())
            } else {
                ClientError::NetworkError(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(ClientError::HttpError {
                status: status.as_u16(),
                message: format!("Quarantine request rejected: {status}"),
            })
        }
    }

    pub fn connection_stats(&self) -> ConnectionStats {
        let total_requests = self.stats.total_requests.load(Ordering::Relaxed);
        let successful_requests = self.stats.successful_requests.load(Ordering::Relaxed);
        let failed_requests = self.stats.failed_requests.load(Ordering::Relaxed);
        let total_response_time = self.stats.total_response_time.load(Ordering::Relaxed);

        let average_response_time = if total_requests > 0 {
            Duration::from_millis(total_response_time / total_requests)
        } else {
            Duration::ZERO
        };

        ConnectionStats {
            total_requests,
            successful_requests,
            failed_requests,
            average_response_time,
        }
    }
}

impl QuarantineApi for QuarantineClient {
    async fn quarantine(&self, request: &QuarantineRequest) -> Result<u16, ClientError> {
        let start = Instant::now();
        let result = self.post(request).await;
        self.stats.record_request(result.is_ok(), start.elapsed());
        result
    }

    fn endpoint(&self) -> &str {
        &self.config.api_url
    }
}
