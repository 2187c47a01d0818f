//! pub.dev API endpoints and wire types

use crate::cache::ResponseCache;
use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::types::{PackageInfo, PackageScore, SearchResult};
use serde::Deserialize;
use std::collections::HashMap;

const PUB_DEV_URL: &str = "https://pub.dev";

/// How many search hits get the full info + metrics treatment
const SEARCH_LIMIT: usize = 15;

/// Lookup batch size; bounds concurrent requests per chunk
const BATCH_SIZE: usize = 5;

#[derive(Debug, Deserialize)]
struct PackageResponse {
    name: String,
    latest: LatestRelease,
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    version: String,
    pubspec: PubspecSummary,
}

#[derive(Debug, Deserialize)]
struct PubspecSummary {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    score: PackageScore,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    packages: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    package: String,
}

/// Fetch through the cache, storing the raw JSON keyed by request path
async fn get_cached<T: serde::de::DeserializeOwned>(
    http: &HttpClient,
    cache: &ResponseCache,
    path: &str,
) -> Result<T> {
    if let Some(hit) = cache.get(path) {
        tracing::debug!(path, "registry cache hit");
        return Ok(serde_json::from_value(hit)?);
    }

    let url = format!("{}{}", PUB_DEV_URL, path);
    let value: serde_json::Value = http.get_json(&url).await?;
    cache.insert(path, value.clone());
    Ok(serde_json::from_value(value)?)
}

/// Percent-encode a value for use in a request path or query string
fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidPackageName(
            "package name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Fetch latest version and description for a package
pub async fn fetch_package_info(
    http: &HttpClient,
    cache: &ResponseCache,
    name: &str,
) -> Result<PackageInfo> {
    validate_name(name)?;

    let path = format!("/api/packages/{}", encode_component(name));
    let response: PackageResponse =
        get_cached(http, cache, &path).await.map_err(|e| {
            if e.to_string().contains("404") {
                Error::PackageNotFound(name.to_string())
            } else {
                e
            }
        })?;

    Ok(PackageInfo {
        name: response.name,
        latest_version: response.latest.version,
        description: response.latest.pubspec.description.unwrap_or_default(),
    })
}

/// Fetch the pana score for a package
pub async fn fetch_package_metrics(
    http: &HttpClient,
    cache: &ResponseCache,
    name: &str,
) -> Result<PackageScore> {
    validate_name(name)?;
    let path = format!("/api/packages/{}/metrics", encode_component(name));
    let response: MetricsResponse = get_cached(http, cache, &path).await?;
    Ok(response.score)
}

/// Search the registry and enrich the top hits with info and metrics
///
/// Per-hit detail failures degrade to empty fields; only the search
/// request itself can fail the whole call.
pub async fn search(
    http: &HttpClient,
    cache: &ResponseCache,
    query: &str,
) -> Result<Vec<SearchResult>> {
    let path = format!("/api/search?q={}", encode_component(query));
    let response: SearchResponse = get_cached(http, cache, &path).await?;

    let lookups = response
        .packages
        .into_iter()
        .take(SEARCH_LIMIT)
        .map(|hit| async move {
            let name = hit.package;
            match fetch_package_info(http, cache, &name).await {
                Ok(info) => {
                    let score = fetch_package_metrics(http, cache, &name)
                        .await
                        .unwrap_or_default();
                    SearchResult {
                        name,
                        version: info.latest_version,
                        description: info.description,
                        likes: score.like_count,
                        points: score.granted_points,
                    }
                }
                Err(e) => {
                    tracing::debug!(package = %name, error = %e, "search detail lookup failed");
                    SearchResult {
                        name,
                        version: String::new(),
                        description: String::new(),
                        likes: 0,
                        points: 0,
                    }
                }
            }
        });

    Ok(futures::future::join_all(lookups).await)
}

/// Look up many packages in bounded concurrent batches
///
/// A failing package maps to [`PackageInfo::unknown`] instead of
/// aborting the rest of the batch.
pub async fn batch_package_info(
    http: &HttpClient,
    cache: &ResponseCache,
    names: &[String],
) -> HashMap<String, PackageInfo> {
    let mut results = HashMap::new();

    for chunk in names.chunks(BATCH_SIZE) {
        let lookups = chunk
            .iter()
            .map(|name| async move { (name.clone(), fetch_package_info(http, cache, name).await) });

        for (name, outcome) in futures::future::join_all(lookups).await {
            match outcome {
                Ok(info) => {
                    results.insert(name, info);
                }
                Err(e) => {
                    tracing::warn!(package = %name, error = %e, "package lookup failed");
                    results.insert(name.clone(), PackageInfo::unknown(name));
                }
            }
        }
    }

    results
}
