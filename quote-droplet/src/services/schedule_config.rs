//! Notification schedule configuration
//!
//! Persists the user's chosen notification time and category in the
//! shared settings store. Whether those values override the built-in
//! defaults is tracked per process only and is never written out.

use crate::config::{DEFAULT_NOTIFICATION_OFFSET_MINUTES, NOTIFICATION_TIME_KEY, QUOTE_CATEGORY_KEY};
use crate::error::Result;
use crate::models::{Classification, TimeOfDay};
use crate::storage::KeyValueStore;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;

/// Effective notification settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleConfig {
    pub time_of_day: TimeOfDay,
    pub category: Classification,
    /// Set once the user changes time or category in this process
    pub is_overridden: bool,
}

impl ScheduleConfig {
    /// Built-in defaults: a few minutes after `now`, no category filter
    pub fn defaults_at(now: NaiveDateTime) -> Self {
        let time = now + Duration::minutes(DEFAULT_NOTIFICATION_OFFSET_MINUTES);

        Self {
            time_of_day: TimeOfDay::from_naive_time(time.time()),
            category: Classification::All,
            is_overridden: false,
        }
    }
}

/// Loads and saves the schedule configuration
#[derive(Clone)]
pub struct ScheduleConfigService {
    store: Arc<dyn KeyValueStore>,
    defaults: ScheduleConfig,
}

impl ScheduleConfigService {
    pub fn new(store: Arc<dyn KeyValueStore>, defaults: ScheduleConfig) -> Self {
        Self { store, defaults }
    }

    /// Built-in defaults for this process
    pub fn defaults(&self) -> ScheduleConfig {
        self.defaults
    }

    /// Last saved configuration.
    ///
    /// Each value falls back to its default when missing or unreadable,
    /// so this never fails. `is_overridden` is always false here.
    pub async fn load(&self) -> ScheduleConfig {
        let time_of_day = self
            .load_value(NOTIFICATION_TIME_KEY)
            .await
            .unwrap_or(self.defaults.time_of_day);

        let category = self
            .load_value(QUOTE_CATEGORY_KEY)
            .await
            .unwrap_or(self.defaults.category);

        ScheduleConfig {
            time_of_day,
            category,
            is_overridden: false,
        }
    }

    async fn load_value<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read setting {}: {}", key, e);
                return None;
            }
        };

        match raw.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring stored {} value {:?}: {}", key, raw, e);
                None
            }
        }
    }

    /// Persist time and category
    pub async fn save(&self, config: &ScheduleConfig) -> Result<()> {
        self.store
            .set(NOTIFICATION_TIME_KEY, &config.time_of_day.to_string())
            .await?;
        self.store
            .set(QUOTE_CATEGORY_KEY, config.category.tag())
            .await?;

        tracing::info!(
            "Saved notification settings: {} ({})",
            config.time_of_day,
            config.category
        );
        Ok(())
    }
}
