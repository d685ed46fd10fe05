//! Notification scheduler
//!
//! Builds a rolling window of daily quote notifications and replaces
//! whatever is pending in the notification center with it.
//!
//! Every pass is a cancel-then-submit transaction: all pending requests
//! are cancelled, then one request per day is submitted for the next
//! [`SCHEDULE_WINDOW_DAYS`] days. The scheduler therefore assumes it is the
//! only producer of local notifications. Passes are serialized, and a pass
//! that has not started by the time a newer call arrives is dropped, so
//! the most recent call always determines what stays pending. A user edit
//! is saved by whichever pass runs, even when its own pass was dropped.

use crate::clock::Clock;
use crate::config::{
    MAX_NOTIFICATION_QUOTE_LEN, NOTIFICATION_SOUND, NOTIFICATION_TITLE, SCHEDULE_WINDOW_DAYS,
};
use crate::corpus::QuoteCorpus;
use crate::error::{AppError, Result};
use crate::models::{Classification, NotificationRequest, QuoteRecord, TimeOfDay};
use crate::notifications::NotificationCenter;
use crate::services::schedule_config::{ScheduleConfig, ScheduleConfigService};
use crate::services::selection::{filter_by_classification, length_eligible, pick_random};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use uuid::Uuid;

/// Outcome of one scheduling pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    /// Requests accepted by the notification center
    pub submitted: usize,
    /// Requests the notification center rejected
    pub failed: usize,
    /// Days left empty because no eligible quote exists
    pub skipped_days: usize,
    /// A later call replaced this pass before it started
    pub superseded: bool,
}

/// Completion signal for a pass running in the background.
///
/// Dropping it does not stop the pass.
pub struct ScheduleHandle {
    handle: JoinHandle<ScheduleReport>,
}

impl ScheduleHandle {
    /// Wait until every request of the pass has been submitted
    pub async fn wait(self) -> Result<ScheduleReport> {
        self.handle
            .await
            .map_err(|e| AppError::Generic(format!("Scheduling task failed: {}", e)))
    }
}

/// Scheduler service for daily quote notifications
#[derive(Clone)]
pub struct NotificationScheduler {
    corpus: QuoteCorpus,
    config_service: ScheduleConfigService,
    center: Arc<dyn NotificationCenter>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<StdRng>>,
    current: Arc<Mutex<ScheduleConfig>>,
    /// Latest user edit not yet written to the store
    unsaved: Arc<Mutex<Option<ScheduleConfig>>>,
    transaction: Arc<tokio::sync::Mutex<()>>,
    generation: Arc<AtomicU64>,
}

impl NotificationScheduler {
    pub fn new(
        corpus: QuoteCorpus,
        config_service: ScheduleConfigService,
        center: Arc<dyn NotificationCenter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_rng(corpus, config_service, center, clock, StdRng::from_entropy())
    }

    /// Same as [`NotificationScheduler::new`] with a caller-supplied generator
    pub fn with_rng(
        corpus: QuoteCorpus,
        config_service: ScheduleConfigService,
        center: Arc<dyn NotificationCenter>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        let defaults = config_service.defaults();

        Self {
            corpus,
            config_service,
            center,
            clock,
            rng: Arc::new(Mutex::new(rng)),
            current: Arc::new(Mutex::new(defaults)),
            unsaved: Arc::new(Mutex::new(None)),
            transaction: Arc::new(tokio::sync::Mutex::new(())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Configuration the next no-argument pass will use
    pub fn effective_config(&self) -> ScheduleConfig {
        let current = *self.current.lock().unwrap_or_else(|e| e.into_inner());

        if current.is_overridden {
            current
        } else {
            self.config_service.defaults()
        }
    }

    /// Reschedule with the user's values if they changed anything during
    /// this process, otherwise with the built-in defaults.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule_notifications(&self) -> ScheduleHandle {
        let config = self.effective_config();
        self.schedule_notifications_with(config.time_of_day, config.category, true)
    }

    /// Reschedule with explicit values.
    ///
    /// With `defaults == false` the values are treated as a user edit: they
    /// are saved and override the built-in defaults for the rest of the
    /// process.
    pub fn schedule_notifications_with(
        &self,
        time_of_day: TimeOfDay,
        category: Classification,
        defaults: bool,
    ) -> ScheduleHandle {
        if !defaults {
            let config = ScheduleConfig {
                time_of_day,
                category,
                is_overridden: true,
            };
            *self.current.lock().unwrap_or_else(|e| e.into_inner()) = config;
            *self.unsaved.lock().unwrap_or_else(|e| e.into_inner()) = Some(config);
        }

        let today = self.clock.now().date();
        let (requests, skipped_days) = self.build_requests(time_of_day, category, today);

        tracing::info!(
            "Scheduling {} notifications at {} for category {} ({} days skipped)",
            requests.len(),
            time_of_day,
            category,
            skipped_days
        );

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let config_service = self.config_service.clone();
        let unsaved = Arc::clone(&self.unsaved);
        let center = Arc::clone(&self.center);
        let transaction = Arc::clone(&self.transaction);

        let handle = tokio::spawn(async move {
            let _guard = transaction.lock().await;

            let to_save = unsaved.lock().unwrap_or_else(|e| e.into_inner()).take();
            if let Some(config) = to_save {
                if let Err(e) = config_service.save(&config).await {
                    tracing::warn!("Failed to save notification settings: {}", e);
                }
            }

            // Tasks may start out of call order; only the newest call schedules
            if latest.load(Ordering::SeqCst) != generation {
                tracing::debug!("Scheduling pass {} superseded", generation);
                return ScheduleReport {
                    superseded: true,
                    ..ScheduleReport::default()
                };
            }

            if let Err(e) = center.cancel_all().await {
                tracing::error!("Failed to cancel pending notifications: {}", e);
            }

            let mut submissions = JoinSet::new();
            for request in requests {
                let center = Arc::clone(&center);
                submissions.spawn(async move {
                    let id = request.id.clone();
                    center.submit(request).await.map_err(|e| (id, e))
                });
            }

            let mut report = ScheduleReport {
                skipped_days,
                ..ScheduleReport::default()
            };

            while let Some(result) = submissions.join_next().await {
                match result {
                    Ok(Ok(())) => report.submitted += 1,
                    Ok(Err((id, e))) => {
                        tracing::error!("Error scheduling notification {}: {}", id, e);
                        report.failed += 1;
                    }
                    Err(e) => {
                        tracing::error!("Notification submission task failed: {}", e);
                        report.failed += 1;
                    }
                }
            }

            tracing::info!(
                "Notification schedule replaced: {} submitted, {} failed",
                report.submitted,
                report.failed
            );
            report
        });

        ScheduleHandle { handle }
    }

    /// Requests for each day of the window starting at `today`, plus the
    /// number of days skipped for lack of an eligible quote.
    pub fn build_requests(
        &self,
        time_of_day: TimeOfDay,
        category: Classification,
        today: NaiveDate,
    ) -> (Vec<NotificationRequest>, usize) {
        let matching = filter_by_classification(self.corpus.records(), category);
        let eligible = length_eligible(&matching, MAX_NOTIFICATION_QUOTE_LEN);

        let title = notification_title(category);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let mut requests = Vec::with_capacity(SCHEDULE_WINDOW_DAYS as usize);
        let mut skipped_days = 0;

        for offset in 0..SCHEDULE_WINDOW_DAYS {
            let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
                tracing::error!("Unable to calculate date {} days after {}", offset, today);
                skipped_days += 1;
                continue;
            };

            let Some(quote) = pick_random(&eligible, &mut *rng) else {
                tracing::debug!("No eligible {} quote for {}", category.tag(), date);
                skipped_days += 1;
                continue;
            };

            requests.push(NotificationRequest {
                id: Uuid::new_v4().to_string(),
                trigger: time_of_day.on(date),
                title: title.clone(),
                body: notification_body(quote),
                sound: NOTIFICATION_SOUND.to_string(),
            });
        }

        if skipped_days == SCHEDULE_WINDOW_DAYS as usize {
            tracing::warn!(
                "No quotes of {} characters or fewer for category {}",
                MAX_NOTIFICATION_QUOTE_LEN,
                category
            );
        }

        (requests, skipped_days)
    }
}

/// Generic title for the catch-all, otherwise the category is named
pub fn notification_title(category: Classification) -> String {
    if category.is_catch_all() {
        NOTIFICATION_TITLE.to_string()
    } else {
        format!("{}: {}", NOTIFICATION_TITLE, category.display_name())
    }
}

/// Quote text, followed by an attribution line when the author is known
pub fn notification_body(quote: &QuoteRecord) -> String {
    match quote.known_author() {
        Some(author) => format!("{}\n— {}", quote.text, author),
        None => quote.text.clone(),
    }
}
