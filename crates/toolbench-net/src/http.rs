//! First-hop HTTP header check
//!
//! Redirects are never followed: the report describes the response of the
//! URL that was asked about, including any `Location` it points to.

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Method, Url};
use serde::Serialize;
use std::future::Future;
use thiserror::Error;

use toolbench_core::config::HttpConfig;
use toolbench_core::types::HttpMethod;

#[derive(Debug, Error)]
pub enum HttpCheckError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Status line and headers of a single response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    pub url: String,
    pub status: u16,
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
    pub redirect_location: Option<String>,
}

impl HeaderReport {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// First header value with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP client that performs exactly one request and does not follow
/// redirects.
pub trait HeaderFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<HeaderReport, HttpCheckError>> + Send;
}

/// Parse user input into an http(s) URL. Bare hosts default to https.
pub fn validate_url(input: &str) -> Result<Url, HttpCheckError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(HttpCheckError::InvalidUrl("empty".into()));
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    let url = Url::parse(&candidate).map_err(|e| HttpCheckError::InvalidUrl(format!("{input}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(HttpCheckError::InvalidUrl(format!(
                "unsupported scheme '{other}' (expected http or https)"
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(HttpCheckError::InvalidUrl(format!("{input}: missing host")));
    }
    Ok(url)
}

/// Validate `input` and fetch its headers once.
pub async fn check_headers<F: HeaderFetcher>(
    fetcher: &F,
    input: &str,
) -> Result<HeaderReport, HttpCheckError> {
    let url = validate_url(input)?;
    tracing::debug!(%url, "checking headers");
    let report = fetcher.fetch(&url).await?;
    tracing::debug!(%url, status = report.status, "header check done");
    Ok(report)
}

/// reqwest client with redirect following disabled
pub struct ReqwestFetcher {
    client: reqwest::Client,
    method: Method,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, HttpCheckError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| HttpCheckError::Request(format!("building HTTP client: {e}")))?;
        let method = match config.method {
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Get => Method::GET,
        };
        Ok(Self { client, method })
    }
}

impl HeaderFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<HeaderReport, HttpCheckError> {
        let response = self
            .client
            .request(self.method.clone(), url.clone())
            .send()
            .await
            .map_err(|e| HttpCheckError::Request(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let redirect_location = response
            .headers()
            .get(LOCATION)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        Ok(HeaderReport {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            redirect_location,
        })
    }
}
