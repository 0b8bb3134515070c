//! Source retrieval from files, standard input and (with the `fetch`
//! feature) HTTP URLs.
//!
//! Fetching is the only place the core touches disk or network; every
//! engine downstream works on plain text.

use std::fs;
use std::path::Path;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
use url::Url;

use crate::{PagewrightError, Result};

/// HTTP client configuration for fetching page sources.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("pagewright/{}", env!("CARGO_PKG_VERSION")) }
    }
}

/// Parses and checks an absolute http(s) URL.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| PagewrightError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(PagewrightError::InvalidUrl(format!(
            "unsupported scheme '{}', expected http or https",
            other
        ))),
    }
}

/// Fetches a page source over HTTP.
///
/// Follows redirects and applies the configured timeout. Non-success
/// statuses are reported as HTTP errors.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(&config.user_agent)
        .build()
        .map_err(PagewrightError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("Accept", "text/plain,text/html,*/*;q=0.8")
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| {
            if e.is_timeout() {
                PagewrightError::Timeout { timeout: config.timeout }
            } else {
                PagewrightError::HttpError(e)
            }
        })?;

    Ok(response.text().await?)
}

/// Reads a source file from disk.
pub fn fetch_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        Err(PagewrightError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(PagewrightError::from)
    }
}

/// Reads all of standard input.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}

/// Identity hint for a fetched URL: the last path segment without its
/// extension, else the host, else `index`.
pub fn identity_hint_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|s| s.split('.').next().unwrap_or(s).to_string())
        .filter(|s| !s.is_empty());

    segment
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "index".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.starts_with("pagewright/"));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(PagewrightError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("https://example.com/about").is_ok());
        assert!(matches!(parse_url("ftp://example.com"), Err(PagewrightError::InvalidUrl(_))));
        assert!(parse_url("example.com").is_err());
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/page.tsx");
        assert!(matches!(result, Err(PagewrightError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("About.tsx");
        fs::write(&path, "<h1>About</h1>").unwrap();

        assert_eq!(fetch_file(&path).unwrap(), "<h1>About</h1>");
    }

    #[test]
    fn test_identity_hint_from_url() {
        let hint = |u: &str| identity_hint_from_url(&Url::parse(u).unwrap());

        assert_eq!(hint("https://example.com/pages/About.tsx"), "About");
        assert_eq!(hint("https://example.com/services/"), "services");
        assert_eq!(hint("https://example.com/"), "example.com");
    }
}
