//! Rate-limited HTTP fetcher
//!
//! One GET per call, no retries. A fixed politeness delay is slept after
//! every attempt regardless of outcome, so the request rate against the
//! source server is bounded per worker: N workers sustain at most
//! N requests per delay interval.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Builds the HTTP client shared by all workers
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value to send
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues rate-limited single GET requests
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    politeness: Duration,
}

impl Fetcher {
    /// Creates a fetcher over a shared client with the given politeness
    /// delay
    pub fn new(client: Client, politeness: Duration) -> Self {
        Self { client, politeness }
    }

    /// Fetches a URL, returning the response body
    ///
    /// Exactly one request is issued; the politeness delay is slept before
    /// returning, success or not. Non-success status codes and transport
    /// failures both classify as `FetchError` — the caller skips the unit,
    /// there is no retry.
    ///
    /// # Arguments
    ///
    /// * `url` - The resolved document URL
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body
    /// * `Err(FetchError)` - Non-success status or transport failure
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let outcome = self.client.get(url.clone()).send().await;

        // The delay throttles attempts, not successes
        tokio::time::sleep(self.politeness).await;

        let response = outcome.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
