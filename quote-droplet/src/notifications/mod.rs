//! Notification delivery
//!
//! The notification center is the OS primitive the scheduler talks to:
//! it accepts requests with a trigger time and delivers them at or after
//! that time. The scheduler assumes it owns every pending request.

pub mod local;

pub use local::{ChannelSink, LocalNotificationCenter, LogSink, NotificationSink};

use crate::error::Result;
use crate::models::NotificationRequest;
use async_trait::async_trait;

#[async_trait]
pub trait NotificationCenter: Send + Sync {
    /// Remove every pending request, whoever submitted it
    async fn cancel_all(&self) -> Result<()>;

    /// Register one request for delivery at its trigger time
    async fn submit(&self, request: NotificationRequest) -> Result<()>;
}
