//! Random quote HTTP source.

use crate::config::{ConfigError, QuoteSyncConfig};
use crate::domain::{GatewayError, QuoteDraft};
use crate::ports::RandomQuoteSource;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RandomQuote {
    #[serde(rename = "_id")]
    id: String,
    content: String,
    author: String,
}

/// Fetches quotes from a `GET {url}` → `{ _id, content, author }` service.
pub struct HttpQuoteSource {
    url: String,
    client: reqwest::Client,
}

impl HttpQuoteSource {
    /// Source at `config.random_quote_url`.
    pub fn new(config: &QuoteSyncConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            url: config.random_quote_url.clone(),
            client,
        })
    }
}

#[async_trait]
impl RandomQuoteSource for HttpQuoteSource {
    async fn random_quote(&self) -> Result<QuoteDraft, GatewayError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Network(format!("HTTP error! status: {status}")));
        }
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        parse_random_quote(&body)
    }
}

fn parse_random_quote(body: &str) -> Result<QuoteDraft, GatewayError> {
    let quote: RandomQuote =
        serde_json::from_str(body).map_err(|e| GatewayError::Malformed(e.to_string()))?;
    debug!(source_id = %quote.id, "Random quote received");
    Ok(QuoteDraft::new(quote.content, quote.author))
}
