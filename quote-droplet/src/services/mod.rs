//! Services module
//!
//! Business logic: quote selection, the interactive quote path, schedule
//! configuration and the notification scheduler.

pub mod quotes;
pub mod schedule_config;
pub mod scheduler;
pub mod selection;

pub use quotes::{DisplayQuote, QuoteService};
pub use schedule_config::{ScheduleConfig, ScheduleConfigService};
pub use scheduler::{NotificationScheduler, ScheduleHandle, ScheduleReport};
