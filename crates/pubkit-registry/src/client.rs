//! HTTP client wrapper with rate limiting

use crate::error::Result;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Rate limiter for the registry
pub type RegistryRateLimiter = Arc<
    RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
>;

/// HTTP client wrapper for registry requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    rate_limiter: Option<RegistryRateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration (no rate limiting)
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Self::build_client()?,
            rate_limiter: None,
        })
    }

    /// Create a new HTTP client limited to `requests_per_second`
    pub fn with_rate_limit(requests_per_second: u32) -> Result<Self> {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN),
        );
        Ok(Self {
            client: Self::build_client()?,
            rate_limiter: Some(Arc::new(RateLimiter::direct(quota))),
        })
    }

    fn build_client() -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(format!("pubkit/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(client)
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
    }

    /// Make a GET request and deserialize the JSON response
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.wait_for_rate_limit().await;

        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(crate::error::Error::RateLimitExceeded(url.to_string()));
        }
        if !response.status().is_success() {
            return Err(crate::error::Error::other(format!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            )));
        }

        let json = response.json().await?;
        Ok(json)
    }
}
