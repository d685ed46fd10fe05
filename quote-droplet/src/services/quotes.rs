//! Quote service
//!
//! The interactive "get quote" path used by the quote view: a random
//! quote for a category, preferring the remote service and falling back
//! to the bundled corpus. No length limit applies here.

use crate::api::QuoteSource;
use crate::config::NO_QUOTE_FOUND;
use crate::corpus::QuoteCorpus;
use crate::models::{Classification, QuoteRecord};
use crate::services::selection::{filter_by_classification, pick_random};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Quote ready for display; `author` is `None` when unattributed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayQuote {
    pub text: String,
    pub author: Option<String>,
}

impl DisplayQuote {
    pub fn not_found() -> Self {
        Self {
            text: NO_QUOTE_FOUND.to_string(),
            author: None,
        }
    }
}

impl From<&QuoteRecord> for DisplayQuote {
    fn from(quote: &QuoteRecord) -> Self {
        Self {
            text: quote.text.clone(),
            author: quote.known_author().map(str::to_string),
        }
    }
}

#[derive(Clone)]
pub struct QuoteService {
    corpus: QuoteCorpus,
    source: Option<Arc<dyn QuoteSource>>,
}

impl QuoteService {
    pub fn new(corpus: QuoteCorpus, source: Option<Arc<dyn QuoteSource>>) -> Self {
        Self { corpus, source }
    }

    /// Random quote for `category`
    pub async fn get_quote(&self, category: Classification) -> DisplayQuote {
        if let Some(source) = &self.source {
            match source.fetch(category).await {
                Ok(quote) => return DisplayQuote::from(&quote),
                Err(e) => {
                    tracing::warn!("Remote quote fetch failed, using bundled quotes: {}", e);
                }
            }
        }

        self.local_quote(category)
    }

    /// Random quote for `category` from the bundled corpus only
    pub fn local_quote(&self, category: Classification) -> DisplayQuote {
        let matching = filter_by_classification(self.corpus.records(), category);

        pick_random(&matching, &mut rand::thread_rng())
            .map(DisplayQuote::from)
            .unwrap_or_else(DisplayQuote::not_found)
    }

    /// Per-category counts shown next to each category button
    pub fn quote_counts(&self) -> HashMap<Classification, usize> {
        self.corpus.counts_by_classification()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use async_trait::async_trait;

    struct FixedSource(Result<QuoteRecord>);

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn fetch(&self, _classification: Classification) -> Result<QuoteRecord> {
            match &self.0 {
                Ok(quote) => Ok(quote.clone()),
                Err(_) => Err(AppError::QuoteSource { status: 500 }),
            }
        }
    }

    fn quote(id: i64, text: &str, author: &str, classification: &str) -> QuoteRecord {
        QuoteRecord {
            id,
            text: text.to_string(),
            author: author.to_string(),
            classification: classification.to_string(),
        }
    }

    fn corpus() -> QuoteCorpus {
        QuoteCorpus::from_records(vec![
            quote(1, "Be brave.", "Unknown Author", "motivation"),
            quote(2, &"a very long quote ".repeat(10), "Seneca", "wisdom"),
        ])
    }

    #[tokio::test]
    async fn test_local_quote_ignores_length_limit() {
        let service = QuoteService::new(corpus(), None);

        let quote = service.get_quote(Classification::Wisdom).await;

        assert!(quote.text.len() > 100);
        assert_eq!(quote.author, Some("Seneca".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_author_is_hidden() {
        let service = QuoteService::new(corpus(), None);

        let quote = service.get_quote(Classification::Motivation).await;

        assert_eq!(quote.text, "Be brave.");
        assert_eq!(quote.author, None);
    }

    #[tokio::test]
    async fn test_no_match_reports_not_found() {
        let service = QuoteService::new(corpus(), None);

        assert_eq!(
            service.get_quote(Classification::Love).await,
            DisplayQuote::not_found()
        );
    }

    #[tokio::test]
    async fn test_remote_quote_preferred() {
        let remote = quote(9, "Remote wisdom.", "Laozi", "wisdom");
        let service = QuoteService::new(corpus(), Some(Arc::new(FixedSource(Ok(remote)))));

        let quote = service.get_quote(Classification::Love).await;

        assert_eq!(quote.text, "Remote wisdom.");
        assert_eq!(quote.author, Some("Laozi".to_string()));
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_corpus() {
        let failing = FixedSource(Err(AppError::Generic("down".to_string())));
        let service = QuoteService::new(corpus(), Some(Arc::new(failing)));

        let quote = service.get_quote(Classification::Motivation).await;

        assert_eq!(quote.text, "Be brave.");
    }

    #[test]
    fn test_quote_counts() {
        let service = QuoteService::new(corpus(), None);
        let counts = service.quote_counts();

        assert_eq!(counts[&Classification::All], 2);
        assert_eq!(counts[&Classification::Wisdom], 1);
    }
}
