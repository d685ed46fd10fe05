//! In-process notification center
//!
//! Holds pending requests in memory and runs a background task that
//! checks for due requests on a fixed interval, handing each one to a
//! sink exactly once.

use super::NotificationCenter;
use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::NotificationRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Where due notifications end up
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, request: &NotificationRequest) -> Result<()>;
}

/// Writes delivered notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, request: &NotificationRequest) -> Result<()> {
        tracing::info!(
            sound = %request.sound,
            "Notification: {} - {}",
            request.title,
            request.body
        );
        Ok(())
    }
}

/// Forwards delivered notifications to a channel receiver
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NotificationRequest>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&self, request: &NotificationRequest) -> Result<()> {
        self.tx
            .send(request.clone())
            .map_err(|_| AppError::Notification("Notification receiver dropped".to_string()))
    }
}

/// Notification center backed by an in-memory pending set
#[derive(Clone)]
pub struct LocalNotificationCenter {
    pending: Arc<Mutex<HashMap<String, NotificationRequest>>>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl LocalNotificationCenter {
    pub fn new(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            sink,
            clock,
        }
    }

    /// Pending requests ordered by trigger time
    pub async fn pending(&self) -> Vec<NotificationRequest> {
        let pending = self.pending.lock().await;
        let mut requests: Vec<NotificationRequest> = pending.values().cloned().collect();
        requests.sort_by(|a, b| a.trigger.cmp(&b.trigger).then_with(|| a.id.cmp(&b.id)));
        requests
    }

    /// Start the background delivery loop
    pub fn start_delivery(self, poll_interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("Starting notification delivery loop");

            let mut interval = tokio::time::interval(poll_interval);

            loop {
                interval.tick().await;

                let delivered = self.deliver_due().await;
                if delivered > 0 {
                    tracing::debug!("Delivered {} notifications", delivered);
                }
            }
        })
    }

    /// Deliver and remove every request whose trigger has passed.
    /// Returns how many were handed to the sink successfully.
    pub async fn deliver_due(&self) -> usize {
        let now = self.clock.now();

        let mut due: Vec<NotificationRequest> = {
            let mut pending = self.pending.lock().await;
            let due_ids: Vec<String> = pending
                .values()
                .filter(|request| request.trigger <= now)
                .map(|request| request.id.clone())
                .collect();

            due_ids
                .iter()
                .filter_map(|id| pending.remove(id))
                .collect()
        };
        due.sort_by(|a, b| a.trigger.cmp(&b.trigger));

        let mut delivered = 0;
        for request in &due {
            match self.sink.deliver(request) {
                Ok(()) => {
                    tracing::info!("Notification {} delivered", request.id);
                    delivered += 1;
                }
                Err(e) => tracing::error!("Failed to deliver notification {}: {}", request.id, e),
            }
        }

        delivered
    }
}

#[async_trait]
impl NotificationCenter for LocalNotificationCenter {
    async fn cancel_all(&self) -> Result<()> {
        let mut pending = self.pending.lock().await;
        let removed = pending.len();
        pending.clear();

        tracing::debug!("Cancelled {} pending notifications", removed);
        Ok(())
    }

    async fn submit(&self, request: NotificationRequest) -> Result<()> {
        if request.trigger <= self.clock.now() {
            tracing::debug!(
                "Notification {} trigger {} already passed, it will not be delivered",
                request.id,
                request.trigger
            );
            return Ok(());
        }

        tracing::debug!("Notification {} pending for {}", request.id, request.trigger);
        self.pending.lock().await.insert(request.id.clone(), request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};

    fn start_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 22)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn request(id: &str, trigger: NaiveDateTime) -> NotificationRequest {
        NotificationRequest {
            id: id.to_string(),
            trigger,
            title: "Quote Droplet".to_string(),
            body: format!("Body {}", id),
            sound: "drip.mp3".to_string(),
        }
    }

    fn create_test_center() -> (
        LocalNotificationCenter,
        FixedClock,
        mpsc::UnboundedReceiver<NotificationRequest>,
    ) {
        let clock = FixedClock::new(start_time());
        let (sink, rx) = ChannelSink::new();
        let center = LocalNotificationCenter::new(Arc::new(sink), Arc::new(clock.clone()));
        (center, clock, rx)
    }

    #[tokio::test]
    async fn test_submit_and_list_pending() {
        let (center, _clock, _rx) = create_test_center();

        center
            .submit(request("b", start_time() + ChronoDuration::days(2)))
            .await
            .unwrap();
        center
            .submit(request("a", start_time() + ChronoDuration::days(1)))
            .await
            .unwrap();

        let pending = center.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, "a");
        assert_eq!(pending[1].id, "b");
    }

    #[tokio::test]
    async fn test_past_trigger_is_not_kept() {
        let (center, _clock, _rx) = create_test_center();

        center
            .submit(request("late", start_time() - ChronoDuration::minutes(1)))
            .await
            .unwrap();

        assert!(center.pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_all_clears_pending() {
        let (center, _clock, _rx) = create_test_center();

        for i in 1..=3 {
            center
                .submit(request(&i.to_string(), start_time() + ChronoDuration::hours(i)))
                .await
                .unwrap();
        }

        center.cancel_all().await.unwrap();

        assert!(center.pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_deliver_due_only_delivers_once() {
        let (center, clock, mut rx) = create_test_center();

        center
            .submit(request("soon", start_time() + ChronoDuration::hours(1)))
            .await
            .unwrap();
        center
            .submit(request("later", start_time() + ChronoDuration::days(1)))
            .await
            .unwrap();

        assert_eq!(center.deliver_due().await, 0);

        clock.set(start_time() + ChronoDuration::hours(1));
        assert_eq!(center.deliver_due().await, 1);
        assert_eq!(center.deliver_due().await, 0);

        let delivered = rx.recv().await.unwrap();
        assert_eq!(delivered.id, "soon");

        let pending = center.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "later");
    }

    #[tokio::test]
    async fn test_delivery_loop_delivers_due_requests() {
        let (center, clock, mut rx) = create_test_center();

        center
            .submit(request("soon", start_time() + ChronoDuration::minutes(5)))
            .await
            .unwrap();
        clock.set(start_time() + ChronoDuration::minutes(10));

        let handle = center
            .clone()
            .start_delivery(std::time::Duration::from_millis(10));

        let delivered = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivered.id, "soon");

        handle.abort();
    }
}
