//! Remote quote service
//!
//! Fetches a random quote for a category from the Quote Droplet backend.

pub mod client;

pub use client::HttpQuoteSource;

use crate::error::Result;
use crate::models::{Classification, QuoteRecord};
use async_trait::async_trait;

#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// One quote of the given category, or an error when none can be fetched
    async fn fetch(&self, classification: Classification) -> Result<QuoteRecord>;
}
