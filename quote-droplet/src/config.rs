//! Application configuration constants
//!
//! Central location for scheduling parameters, notification content
//! constants and the keys used against the shared settings store.

use std::time::Duration;

// ===== Scheduling Window =====

/// Number of calendar days covered by one scheduling pass, today included
pub const SCHEDULE_WINDOW_DAYS: u32 = 60;

/// Offset from process start used for the built-in notification time
pub const DEFAULT_NOTIFICATION_OFFSET_MINUTES: i64 = 3;

// ===== Notification Content =====

/// Longest quote text (in characters) eligible for a notification body.
/// Notification banners truncate anything longer.
pub const MAX_NOTIFICATION_QUOTE_LEN: usize = 100;

/// Title used when no category filter is active
pub const NOTIFICATION_TITLE: &str = "Quote Droplet";

/// Sound attached to every scheduled notification
pub const NOTIFICATION_SOUND: &str = "sound-for-noti-water-drip-pixabay.mp3";

/// Author value the quote dataset uses when attribution is missing
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Text shown by the interactive quote view when nothing matches
pub const NO_QUOTE_FOUND: &str = "No Quote Found";

// ===== Settings Store =====

/// Namespace shared with the companion notification/widget surface
pub const SETTINGS_NAMESPACE: &str = "group.selectedSettings";

/// Key holding the persisted notification time (`HH:MM`)
pub const NOTIFICATION_TIME_KEY: &str = "notificationTime";

/// Key holding the persisted notification category tag
pub const QUOTE_CATEGORY_KEY: &str = "quoteCategory";

// ===== Remote Quotes =====

/// Base URL of the remote quote service
pub const DEFAULT_QUOTE_API_URL: &str = "http://quote-dropper.fly.dev";

/// Timeout applied to every request against the quote service
pub const QUOTE_API_TIMEOUT: Duration = Duration::from_secs(10);

// ===== Local Delivery =====

/// How often the in-process notification center checks for due requests
pub const DELIVERY_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Bundled dataset file name looked up inside the data directory
pub const CORPUS_FILE_NAME: &str = "QuotesBackup.json";
