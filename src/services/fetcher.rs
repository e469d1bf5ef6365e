//! Page fetcher for retrieving raw HTML.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::FetchError;
use crate::models::FetchConfig;

/// A fetched page.
///
/// Non-2xx statuses are returned here, not raised; the coordinator decides
/// whether they abort the harvest.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub status_code: u16,
    pub content_type: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Retrieves raw HTML for an absolute URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// HTTP fetcher backed by reqwest. No retries at this layer.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::ClientError(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::RequestError(e)
            }
        })?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::BodyError(e.to_string()))?;

        Ok(FetchedPage {
            html,
            status_code,
            content_type,
        })
    }
}
