use std::time::Duration;

use garimpo_core::error::ScrapeError;
use garimpo_core::models::FetchedPage;
use garimpo_core::traits::PageFetcher;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};

/// User-agent presented on direct fetches. Listing sites fingerprint
/// obvious bot agents, so this matches a current desktop Chrome.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Direct HTTP fetcher using reqwest.
///
/// Sends a realistic browser request signature (user-agent, accept headers,
/// per-request referer) with a fixed timeout, default 30 s. Responses below
/// status 500 complete as a [`FetchedPage`]; server errors and network
/// failures surface as `Transport`/`Timeout` so the extraction engine can
/// route the source into its render fallback.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.8"),
        );
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|err| ScrapeError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, referer: &str) -> Result<FetchedPage, ScrapeError> {
        tracing::debug!(url, "direct fetch");
        let response = self
            .client
            .get(url)
            .header(REFERER, referer)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ScrapeError::Timeout(self.timeout_secs)
                } else if err.is_connect() {
                    ScrapeError::Transport(format!("connection failed: {err}"))
                } else {
                    ScrapeError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ScrapeError::Transport(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| ScrapeError::Transport(format!("failed to read response body: {err}")))?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_defaults() {
        let fetcher = ReqwestFetcher::new().unwrap();
        assert_eq!(fetcher.timeout_secs, 30);
    }

    #[test]
    fn custom_timeout_is_recorded_for_error_reporting() {
        let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.timeout_secs, 5);
    }
}
