//! Error types for Quote Droplet
//!
//! All errors use thiserror for structured error handling.
//! None of these are fatal to the process: callers log and degrade.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Quote service returned status {status}")]
    QuoteSource { status: u16 },

    #[error("Quote service returned no quotes for '{0}'")]
    EmptyResponse(String),

    #[error("Unknown classification: {0}")]
    InvalidClassification(String),

    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
