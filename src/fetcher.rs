//! HTTP fallback fetch, used only when browser automation is disabled and
//! the source is a URL. Browser renderers navigate directly and never call
//! into this module.

use std::time::Duration;

use reqwest::Client;

use crate::{HxeError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-identifying header so ordinary sites serve the same markup they
/// would serve a real browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Builds the shared HTTP client.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(HxeError::from)
}

/// GETs a URL and returns the response body as text. Non-2xx statuses and
/// transport failures surface as network errors; there are no retries.
pub async fn fetch(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let response = response.error_for_status()?;
    let body = response.text().await?;
    Ok(body)
}
