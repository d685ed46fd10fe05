//! Domain models
//!
//! Quote records, the closed set of quote categories, time-of-day values
//! and the notification requests handed to the notification center.

use crate::config::UNKNOWN_AUTHOR;
use crate::error::{AppError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A quote from the bundled dataset or the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: i64,
    pub text: String,
    pub author: String,
    /// Lowercase category tag, e.g. "motivation"
    pub classification: String,
}

impl QuoteRecord {
    /// Author to attribute, `None` when blank or the unknown-author sentinel
    pub fn known_author(&self) -> Option<&str> {
        let author = self.author.trim();
        if author.is_empty() || author.eq_ignore_ascii_case(UNKNOWN_AUTHOR) {
            None
        } else {
            Some(author)
        }
    }
}

/// Quote category. `All` is the catch-all and never appears on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Motivation,
    Inspiration,
    Philosophy,
    Discipline,
    Wisdom,
    Upliftment,
    Love,
    #[default]
    #[serde(alias = "everything")]
    All,
}

impl Classification {
    pub const ALL_CASES: [Classification; 8] = [
        Classification::Motivation,
        Classification::Inspiration,
        Classification::Philosophy,
        Classification::Discipline,
        Classification::Wisdom,
        Classification::Upliftment,
        Classification::Love,
        Classification::All,
    ];

    /// Canonical lowercase form used for matching records
    pub fn tag(self) -> &'static str {
        match self {
            Classification::Motivation => "motivation",
            Classification::Inspiration => "inspiration",
            Classification::Philosophy => "philosophy",
            Classification::Discipline => "discipline",
            Classification::Wisdom => "wisdom",
            Classification::Upliftment => "upliftment",
            Classification::Love => "love",
            Classification::All => "all",
        }
    }

    /// Form shown to the user
    pub fn display_name(self) -> &'static str {
        match self {
            Classification::Motivation => "Motivation",
            Classification::Inspiration => "Inspiration",
            Classification::Philosophy => "Philosophy",
            Classification::Discipline => "Discipline",
            Classification::Wisdom => "Wisdom",
            Classification::Upliftment => "Upliftment",
            Classification::Love => "Love",
            Classification::All => "All",
        }
    }

    pub fn is_catch_all(self) -> bool {
        self == Classification::All
    }

    /// Case-insensitive match of a record tag against this category
    pub fn matches(self, tag: &str) -> bool {
        self.is_catch_all() || tag.trim().eq_ignore_ascii_case(self.tag())
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Classification {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();

        if s == "everything" {
            return Ok(Classification::All);
        }

        Classification::ALL_CASES
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or(AppError::InvalidClassification(s))
    }
}

/// Hour and minute in local calendar time, no date attached.
///
/// Serialized as `HH:MM`; deserializing goes through the same validation
/// as [`TimeOfDay::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(AppError::InvalidTimeOfDay(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Seconds are dropped: triggers fire on the minute
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }

    /// This time of day on the given calendar date
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.to_naive_time())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::InvalidTimeOfDay(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;

        TimeOfDay::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// One local notification, created fresh on every scheduling pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    pub id: String,
    /// Local wall-clock time at which the notification should fire
    pub trigger: NaiveDateTime,
    pub title: String,
    pub body: String,
    pub sound: String,
}
