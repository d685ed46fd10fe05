//! Bundled quote dataset
//!
//! Loads the JSON array of quotes shipped with the app once at startup.
//! A missing or malformed file degrades to an empty corpus.

use crate::error::Result;
use crate::models::{Classification, QuoteRecord};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Immutable, ordered collection of quotes. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct QuoteCorpus {
    records: Arc<Vec<QuoteRecord>>,
}

impl QuoteCorpus {
    pub fn from_records(records: Vec<QuoteRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Load the corpus, logging and returning an empty corpus on failure
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(corpus) => {
                tracing::info!("Loaded {} quotes from {:?}", corpus.len(), path);
                corpus
            }
            Err(e) => {
                tracing::error!("Failed to load quotes from {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    async fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let records: Vec<QuoteRecord> = serde_json::from_str(&content)?;
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of quotes per category as shown in the quote browser.
    ///
    /// Every record counts toward `All`; records with an unrecognised tag
    /// count toward `All` only.
    pub fn counts_by_classification(&self) -> HashMap<Classification, usize> {
        let mut counts = HashMap::new();

        for record in self.records.iter() {
            if let Ok(classification) = record.classification.parse::<Classification>() {
                if !classification.is_catch_all() {
                    *counts.entry(classification).or_insert(0) += 1;
                }
            }
            *counts.entry(Classification::All).or_insert(0) += 1;
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quote(id: i64, classification: &str) -> QuoteRecord {
        QuoteRecord {
            id,
            text: format!("Quote {}", id),
            author: "Someone".to_string(),
            classification: classification.to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_corpus_from_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quotes.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "text": "Be brave.", "author": "Unknown Author", "classification": "motivation"},
                {"id": 2, "text": "Know thyself.", "author": "Socrates", "classification": "philosophy"}
            ]"#,
        )
        .unwrap();

        let corpus = QuoteCorpus::load(&path).await;

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[1].author, "Socrates");
    }

    #[tokio::test]
    async fn test_load_missing_file_yields_empty_corpus() {
        let temp_dir = TempDir::new().unwrap();

        let corpus = QuoteCorpus::load(&temp_dir.path().join("missing.json")).await;

        assert!(corpus.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_file_yields_empty_corpus() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quotes.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        let corpus = QuoteCorpus::load(&path).await;

        assert!(corpus.is_empty());
    }

    #[test]
    fn test_counts_by_classification() {
        let corpus = QuoteCorpus::from_records(vec![
            quote(1, "motivation"),
            quote(2, "Motivation"),
            quote(3, "wisdom"),
            quote(4, "gardening"),
        ]);

        let counts = corpus.counts_by_classification();

        assert_eq!(counts[&Classification::Motivation], 2);
        assert_eq!(counts[&Classification::Wisdom], 1);
        assert_eq!(counts[&Classification::All], 4);
        assert!(!counts.contains_key(&Classification::Love));
    }
}
