//! Application state and initialization
//!
//! Resolves runtime locations, wires every service together and exposes
//! them through `AppState`. Nothing here is global: each service is
//! constructed once and handed its collaborators explicitly.

use crate::api::{HttpQuoteSource, QuoteSource};
use crate::clock::{Clock, SystemClock};
use crate::config::{CORPUS_FILE_NAME, DEFAULT_QUOTE_API_URL, SETTINGS_NAMESPACE};
use crate::corpus::QuoteCorpus;
use crate::database::{create_pool, SqliteStore};
use crate::error::{AppError, Result};
use crate::notifications::{LocalNotificationCenter, LogSink, NotificationSink};
use crate::services::{NotificationScheduler, QuoteService, ScheduleConfig, ScheduleConfigService};
use crate::storage::{JsonFileStore, KeyValueStore};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub const DATA_DIR_ENV: &str = "QUOTE_DROPLET_DATA_DIR";
pub const CORPUS_ENV: &str = "QUOTE_DROPLET_CORPUS";
pub const API_URL_ENV: &str = "QUOTE_DROPLET_API_URL";
pub const SETTINGS_BACKEND_ENV: &str = "QUOTE_DROPLET_SETTINGS_BACKEND";

/// Where the shared notification settings live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsBackend {
    /// `<data_dir>/<namespace>.json`, readable by the companion surface
    #[default]
    Json,
    /// `settings` table in `<data_dir>/settings.db`
    Sqlite,
}

impl FromStr for SettingsBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(SettingsBackend::Json),
            "sqlite" => Ok(SettingsBackend::Sqlite),
            other => Err(AppError::Settings(format!(
                "Unknown settings backend '{}'. Use 'json' or 'sqlite'",
                other
            ))),
        }
    }
}

/// Runtime options, normally read from the environment
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub app_data_dir: PathBuf,
    pub corpus_path: PathBuf,
    /// `None` disables remote quotes
    pub api_url: Option<String>,
    pub settings_backend: SettingsBackend,
}

impl AppOptions {
    pub fn from_env() -> Result<Self> {
        let app_data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join("QuoteDroplet"))
                .ok_or_else(|| AppError::Generic("Failed to get app data dir".to_string()))?,
        };

        let corpus_path = std::env::var_os(CORPUS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| app_data_dir.join(CORPUS_FILE_NAME));

        let api_url = match std::env::var(API_URL_ENV) {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url),
            Err(_) => Some(DEFAULT_QUOTE_API_URL.to_string()),
        };

        let settings_backend = match std::env::var(SETTINGS_BACKEND_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => SettingsBackend::default(),
        };

        Ok(Self {
            app_data_dir,
            corpus_path,
            api_url,
            settings_backend,
        })
    }
}

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub corpus: QuoteCorpus,
    pub quote_service: QuoteService,
    pub config_service: ScheduleConfigService,
    pub scheduler: NotificationScheduler,
    pub notification_center: LocalNotificationCenter,
}

impl AppState {
    /// Build every service. Delivered notifications go to `sink`.
    pub async fn setup(options: AppOptions, sink: Arc<dyn NotificationSink>) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", options.app_data_dir);

        std::fs::create_dir_all(&options.app_data_dir)?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let corpus = QuoteCorpus::load(&options.corpus_path).await;

        let store: Arc<dyn KeyValueStore> = match options.settings_backend {
            SettingsBackend::Json => Arc::new(JsonFileStore::new(
                &options.app_data_dir,
                SETTINGS_NAMESPACE,
            )),
            SettingsBackend::Sqlite => {
                let pool = create_pool(&options.app_data_dir.join("settings.db")).await?;
                Arc::new(SqliteStore::new(pool, SETTINGS_NAMESPACE))
            }
        };
        tracing::info!(
            "Using {:?} settings store ({})",
            options.settings_backend,
            store.namespace()
        );

        let config_service =
            ScheduleConfigService::new(store, ScheduleConfig::defaults_at(clock.now()));

        let source: Option<Arc<dyn QuoteSource>> = match &options.api_url {
            Some(url) => Some(Arc::new(HttpQuoteSource::new(url.clone())?)),
            None => None,
        };
        let quote_service = QuoteService::new(corpus.clone(), source);

        let notification_center = LocalNotificationCenter::new(sink, Arc::clone(&clock));
        let scheduler = NotificationScheduler::new(
            corpus.clone(),
            config_service.clone(),
            Arc::new(notification_center.clone()),
            clock,
        );

        tracing::info!("Application initialized successfully");

        Ok(Self {
            app_data_dir: options.app_data_dir,
            corpus,
            quote_service,
            config_service,
            scheduler,
            notification_center,
        })
    }

    /// Setup with options from the environment and delivery to the log
    pub async fn setup_from_env() -> Result<Self> {
        Self::setup(AppOptions::from_env()?, Arc::new(LogSink)).await
    }
}
