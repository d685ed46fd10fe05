//! HTTP client for the quote service
//!
//! `GET {base}/quotes/classification={tag}` returns a JSON array of quotes
//! with snake_case fields; one of them is chosen at random.

use super::QuoteSource;
use crate::config::QUOTE_API_TIMEOUT;
use crate::error::{AppError, Result};
use crate::models::{Classification, QuoteRecord};
use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;

/// Quote as returned by the service
#[derive(Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
struct ApiQuote {
    id: i64,
    text: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    classification: Option<String>,
}

impl From<ApiQuote> for QuoteRecord {
    fn from(quote: ApiQuote) -> Self {
        QuoteRecord {
            id: quote.id,
            text: quote.text,
            author: quote.author.unwrap_or_default(),
            classification: quote.classification.unwrap_or_default().to_lowercase(),
        }
    }
}

#[derive(Clone)]
pub struct HttpQuoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuoteSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("QuoteDroplet/", env!("CARGO_PKG_VERSION")))
            .timeout(QUOTE_API_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, classification: Classification) -> String {
        format!(
            "{}/quotes/classification={}",
            self.base_url,
            classification.tag()
        )
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch(&self, classification: Classification) -> Result<QuoteRecord> {
        let url = self.url_for(classification);
        tracing::debug!("Fetching quote from {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Quote service returned status: {}", status);
            return Err(AppError::QuoteSource {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let mut quotes: Vec<ApiQuote> = serde_json::from_str(&body)?;

        if quotes.is_empty() {
            return Err(AppError::EmptyResponse(classification.tag().to_string()));
        }

        let index = rand::thread_rng().gen_range(0..quotes.len());
        Ok(quotes.swap_remove(index).into())
    }
}
