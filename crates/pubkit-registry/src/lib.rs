//! # pubkit-registry
//!
//! pub.dev registry client with short-TTL caching and batched lookups.
//!
//! Failures degrade rather than propagate where a batch is involved: a
//! package whose lookup fails maps to the sentinel
//! [`PackageInfo::unknown`], so one bad package never sinks a refresh of
//! the whole dependency list.
//!
//! # Example
//!
//! ```no_run
//! use pubkit_registry::PubClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubClient::new()?;
//!     let info = client.package_info("http").await?;
//!     println!("http v{}", info.latest_version);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod cache;
mod client;
mod error;
mod pubdev;
mod types;

pub use cache::{ResponseCache, DEFAULT_TTL};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use types::{PackageInfo, PackageScore, SearchResult, UNKNOWN_VERSION};

use std::collections::HashMap;
use std::time::Duration;

/// Main client for pub.dev lookups
///
/// Responses are cached for [`DEFAULT_TTL`]; call
/// [`clear_cache`](PubClient::clear_cache) to force fresh data.
pub struct PubClient {
    http: HttpClient,
    cache: ResponseCache,
}

impl PubClient {
    /// Create a new client with the default cache TTL and no rate limiting
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            cache: ResponseCache::new(),
        })
    }

    /// Create a client limited to `requests_per_second`
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_rate_limit(requests_per_second: u32) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_rate_limit(requests_per_second)?,
            cache: ResponseCache::new(),
        })
    }

    /// Create a client with a custom cache TTL
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_cache_ttl(ttl: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            cache: ResponseCache::with_ttl(ttl),
        })
    }

    /// Fetch latest version and description for a package
    ///
    /// # Errors
    /// Returns [`Error::PackageNotFound`] for unknown packages and
    /// [`Error::Http`] for transport failures.
    pub async fn package_info(&self, name: &str) -> Result<PackageInfo> {
        pubdev::fetch_package_info(&self.http, &self.cache, name).await
    }

    /// Fetch just the latest version string for a package
    ///
    /// # Errors
    /// Same failure modes as [`package_info`](PubClient::package_info).
    pub async fn latest_version(&self, name: &str) -> Result<String> {
        Ok(self.package_info(name).await?.latest_version)
    }

    /// Fetch the pana score for a package; `None` when unavailable
    pub async fn package_metrics(&self, name: &str) -> Option<PackageScore> {
        pubdev::fetch_package_metrics(&self.http, &self.cache, name)
            .await
            .ok()
    }

    /// Search the registry, returning the enriched top hits
    ///
    /// # Errors
    /// Only the search request itself can fail; per-hit detail lookups
    /// degrade to empty fields.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        pubdev::search(&self.http, &self.cache, query).await
    }

    /// Look up many packages in bounded concurrent batches of five
    ///
    /// Never fails as a whole; individual failures map to
    /// [`PackageInfo::unknown`].
    pub async fn batch_package_info(&self, names: &[String]) -> HashMap<String, PackageInfo> {
        pubdev::batch_package_info(&self.http, &self.cache, names).await
    }

    /// Drop all cached responses
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Seam for callers that want to substitute a fake registry in tests
#[async_trait::async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetch latest version and description for a package
    async fn package_info(&self, name: &str) -> Result<PackageInfo>;

    /// Look up many packages, degrading per-package failures to sentinels
    async fn batch_package_info(&self, names: &[String]) -> HashMap<String, PackageInfo>;
}

#[async_trait::async_trait]
impl RegistrySource for PubClient {
    async fn package_info(&self, name: &str) -> Result<PackageInfo> {
        PubClient::package_info(self, name).await
    }

    async fn batch_package_info(&self, names: &[String]) -> HashMap<String, PackageInfo> {
        PubClient::batch_package_info(self, names).await
    }
}
