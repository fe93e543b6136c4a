use crate::domain::ports::DocumentSource;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Fetches documents over HTTP(S). A single attempt, no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpDocumentSource {
    client: Client,
}

impl HttpDocumentSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, location: &str) -> Result<String> {
        let fetch_error = |e: reqwest::Error| EtlError::FetchError {
            location: location.to_string(),
            message: e.to_string(),
        };

        tracing::debug!("Fetching source document: {}", location);
        let response = self.client.get(location).send().await.map_err(fetch_error)?;

        tracing::debug!("Source response status: {}", response.status());
        let body = response
            .error_for_status()
            .map_err(fetch_error)?
            .text()
            .await
            .map_err(fetch_error)?;

        tracing::debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
