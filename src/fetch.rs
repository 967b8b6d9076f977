use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::FetchSettings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
}

fn default_headers(settings: &FetchSettings) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    if let Ok(ua) = HeaderValue::from_str(&settings.user_agent) {
        headers.insert(USER_AGENT, ua);
    }
    headers
}

/// GET a job page and return its body. Redirects are followed; anything
/// outside 2xx is an error.
pub async fn fetch_page(url: &str, settings: &FetchSettings) -> Result<String, FetchError> {
    let client = reqwest::Client::builder()
        .default_headers(default_headers(settings))
        .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
        .build()?;

    let t0 = Instant::now();
    debug!("GET {}", url);
    let resp = client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = resp.text().await?;
    info!(
        "Fetched {} ({} bytes, {}ms)",
        url,
        body.len(),
        t0.elapsed().as_millis()
    );
    Ok(body)
}
