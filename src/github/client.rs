//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Bearer token authentication and GitHub API headers
//! - Status code classification (not found, auth, rate limit)
//! - `Link` header pagination
//!
//! Retrying is left to the caller.

use crate::error::{ConfigError, NotFoundError, ResolveError, UpstreamError};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, StatusCode, Url};
use std::sync::LazyLock;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("depsync/", env!("CARGO_PKG_VERSION"));

/// GitHub REST API version header value
const API_VERSION: &str = "2022-11-28";

static NEXT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<[^>]*[?&]page=(\d+)[^>]*>;\s*rel="next""#).unwrap());

/// HTTP client wrapper for the GitHub API
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("api_url", &self.api_url())
            .finish()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new(token: &str) -> Result<Self, ConfigError> {
        Self::with_config(token, DEFAULT_API_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(
        token: &str,
        api_url: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ConfigError> {
        let base = Url::parse(api_url).map_err(|e| ConfigError::HttpClient {
            message: format!("invalid API URL '{}': {}", api_url, e),
        })?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::HttpClient {
                message: format!("invalid API URL '{}'", api_url),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        if !token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ConfigError::HttpClient {
                    message: format!("invalid token: {}", e),
                }
            })?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self { client, base })
    }

    /// API base URL without trailing slash
    pub fn api_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Build an API URL from path segments; each segment is percent-encoded
    pub fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Perform a GET request and classify failures
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ResolveError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::timeout(url)
            } else {
                UpstreamError::network(url, e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(classify_status(url, status, response.headers()))
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ResolveError> {
        let (body, _) = self.get_json_page(url).await?;
        Ok(body)
    }

    /// Perform a GET request, parse the JSON body and extract the next page number
    pub async fn get_json_page<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<(T, Option<u32>), ResolveError> {
        let response = self.get(url).await?;
        let next = next_page(response.headers());

        let body = response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::timeout(url)
            } else {
                UpstreamError::invalid_response(url, format!("failed to parse JSON: {}", e))
            }
        })?;

        Ok((body, next))
    }
}

/// Map a non-success status to the error taxonomy
fn classify_status(url: &str, status: StatusCode, headers: &HeaderMap) -> ResolveError {
    let quota_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);

    match status {
        StatusCode::NOT_FOUND => NotFoundError::Resource {
            url: url.to_string(),
        }
        .into(),
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited {
            url: url.to_string(),
        }
        .into(),
        StatusCode::FORBIDDEN if quota_exhausted => UpstreamError::RateLimited {
            url: url.to_string(),
        }
        .into(),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Authentication {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into(),
        _ => UpstreamError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into(),
    }
}

/// Page number of the `rel="next"` entry of a `Link` header
pub fn next_page(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',')
        .find_map(|part| NEXT_LINK_RE.captures(part.trim()))
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new("token");
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_without_token() {
        let client = HttpClient::new("");
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_rejects_invalid_token() {
        let client = HttpClient::new("bad\ntoken");
        assert!(matches!(client, Err(ConfigError::HttpClient { .. })));
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let client = HttpClient::with_config(
            "t",
            "https://ghe.example.com/api/v3/",
            DEFAULT_TIMEOUT,
            "test-agent/1.0",
        )
        .unwrap();
        assert_eq!(client.api_url(), "https://ghe.example.com/api/v3");
        assert_eq!(
            client.endpoint(["repos", "o", "r", "releases"]).as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/releases"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = HttpClient::new("t").unwrap();
        assert_eq!(
            client.endpoint(["repos", "o", "r", "commits", "v1#2?x%"]).as_str(),
            "https://api.github.com/repos/o/r/commits/v1%232%3Fx%25"
        );
    }

    #[test]
    fn test_http_client_rejects_invalid_api_url() {
        let client = HttpClient::with_config("t", "not a url", DEFAULT_TIMEOUT, "agent");
        assert!(matches!(client, Err(ConfigError::HttpClient { .. })));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = HttpClient::new("secret-token").unwrap();
        assert!(!format!("{:?}", client).contains("secret-token"));
    }

    #[test]
    fn test_next_page() {
        let headers = link_headers(
            r#"<https://api.github.com/repositories/1/releases?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/releases?per_page=100&page=7>; rel="last""#,
        );
        assert_eq!(next_page(&headers), Some(2));
    }

    #[test]
    fn test_next_page_last_page() {
        let headers = link_headers(
            r#"<https://api.github.com/repositories/1/releases?per_page=100&page=1>; rel="first", <https://api.github.com/repositories/1/releases?per_page=100&page=6>; rel="prev""#,
        );
        assert_eq!(next_page(&headers), None);
    }

    #[test]
    fn test_next_page_missing_header() {
        assert_eq!(next_page(&HeaderMap::new()), None);
    }

    #[test]
    fn test_classify_status() {
        let headers = HeaderMap::new();
        assert!(matches!(
            classify_status("u", StatusCode::NOT_FOUND, &headers),
            ResolveError::NotFound(NotFoundError::Resource { .. })
        ));
        assert!(matches!(
            classify_status("u", StatusCode::UNAUTHORIZED, &headers),
            ResolveError::Upstream(UpstreamError::Authentication { status: 401, .. })
        ));
        assert!(matches!(
            classify_status("u", StatusCode::TOO_MANY_REQUESTS, &headers),
            ResolveError::Upstream(UpstreamError::RateLimited { .. })
        ));
        assert!(matches!(
            classify_status("u", StatusCode::BAD_GATEWAY, &headers),
            ResolveError::Upstream(UpstreamError::Status { status: 502, .. })
        ));
    }

    #[test]
    fn test_classify_forbidden_with_exhausted_quota() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        assert!(matches!(
            classify_status("u", StatusCode::FORBIDDEN, &headers),
            ResolveError::Upstream(UpstreamError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("depsync/"));
        assert_eq!(DEFAULT_API_URL, "https://api.github.com");
    }
}
