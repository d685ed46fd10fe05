//! Quote Droplet library
//!
//! Schedules daily local notifications carrying a random quote, filtered
//! by category, and serves random quotes to the quote view.

pub mod api;
pub mod app;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod database;
pub mod error;
pub mod models;
pub mod notifications;
pub mod services;
pub mod storage;
