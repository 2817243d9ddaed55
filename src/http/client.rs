use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::observability::gateway_metrics;

/// Request pacing for the hosted backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub requests_per_second: u32,
    pub burst_capacity: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_capacity: 20,
        }
    }
}

/// Rate-limited HTTP client that attaches the backend's API key to every request
#[derive(Debug)]
pub struct RateLimitedHttpClient {
    client: Client,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    base_url: String,
    api_key: String,
}

impl RateLimitedHttpClient {
    /// Create a new rate-limited HTTP client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        limits: RateLimitSettings,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let per_second = NonZeroU32::new(limits.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(limits.burst_capacity).unwrap_or(per_second);
        let quota = Quota::per_second(per_second).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            client,
            rate_limiter,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Start a request against `path`, relative to the backend base URL
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Wait for rate limit permission, then send
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, reqwest::Error> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        gateway_metrics().record_request();
        debug!("Executing backend request with rate limiting");

        request.send().await.inspect_err(|_| gateway_metrics().record_error())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
