//! Quote selection
//!
//! Pure functions for narrowing the corpus to a category and drawing a
//! random quote from the result. Randomness is always passed in so tests
//! can use a seeded generator.

use crate::models::{Classification, QuoteRecord};
use rand::seq::SliceRandom;
use rand::Rng;

/// Records matching `category`, in corpus order.
///
/// The catch-all returns the whole corpus. An empty result is expected
/// when nothing matches.
pub fn filter_by_classification(
    corpus: &[QuoteRecord],
    category: Classification,
) -> Vec<&QuoteRecord> {
    corpus
        .iter()
        .filter(|record| category.matches(&record.classification))
        .collect()
}

/// Keep only quotes short enough for a notification body
pub fn length_eligible<'a>(quotes: &[&'a QuoteRecord], max_chars: usize) -> Vec<&'a QuoteRecord> {
    quotes
        .iter()
        .copied()
        .filter(|record| record.text.chars().count() <= max_chars)
        .collect()
}

/// Uniformly random member of `subset`, or `None` when it is empty
pub fn pick_random<'a, R>(subset: &[&'a QuoteRecord], rng: &mut R) -> Option<&'a QuoteRecord>
where
    R: Rng + ?Sized,
{
    subset.choose(rng).copied()
}
