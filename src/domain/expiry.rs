//! Expiry classification.
//!
//! Days left are counted in whole calendar days: both "now" and the expiry
//! timestamp are reduced to their date before subtracting, so the result is
//! the same at 00:01 and 23:59 of the same day.

use crate::domain::model::{ExpiryStatus, Severity};
use crate::utils::error::{PantryError, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CRITICAL_MAX_DAYS: i64 = 2;
pub const DEFAULT_WARNING_MAX_DAYS: i64 = 7;

/// Source of "today". Injected so classification is reproducible in tests.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse an expiry value as stored by the backend or typed by a user.
///
/// Accepts `YYYY-MM-DD`, RFC 3339, and PocketBase's
/// `YYYY-MM-DD HH:MM:SS.sssZ`. The calendar date written in the input is
/// kept as-is; no timezone conversion is applied.
pub fn parse_expiry(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PantryError::invalid_date(input, "date is empty"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local().date());
    }

    // PocketBase: "2025-05-21 00:00:00.000Z"
    let without_zone = trimmed.trim_end_matches('Z');
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(without_zone, format) {
            return Ok(dt.date());
        }
    }

    Err(PantryError::invalid_date(
        input,
        "expected YYYY-MM-DD or an ISO-8601 timestamp",
    ))
}

pub fn days_until_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Countdown text shown next to an item.
pub fn expiry_text(days_left: i64) -> String {
    match days_left {
        d if d < 0 => "Expired".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d => format!("{} days", d),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryPolicy {
    /// Items expiring within this many days (inclusive) are Critical.
    pub critical_max_days: i64,
    /// Items expiring within this many days (inclusive) are Warning.
    pub warning_max_days: i64,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            critical_max_days: DEFAULT_CRITICAL_MAX_DAYS,
            warning_max_days: DEFAULT_WARNING_MAX_DAYS,
        }
    }
}

impl ExpiryPolicy {
    pub fn new(critical_max_days: i64, warning_max_days: i64) -> Result<Self> {
        let policy = Self {
            critical_max_days,
            warning_max_days,
        };
        policy.check()?;
        Ok(policy)
    }

    pub fn check(&self) -> Result<()> {
        if self.critical_max_days < 0 {
            return Err(PantryError::InvalidConfigValueError {
                field: "expiry.critical_max_days".to_string(),
                value: self.critical_max_days.to_string(),
                reason: "Value must be at least 0".to_string(),
            });
        }
        if self.warning_max_days < self.critical_max_days {
            return Err(PantryError::InvalidConfigValueError {
                field: "expiry.warning_max_days".to_string(),
                value: self.warning_max_days.to_string(),
                reason: format!(
                    "Value must be at least critical_max_days ({})",
                    self.critical_max_days
                ),
            });
        }
        Ok(())
    }

    pub fn severity_for(&self, days_left: i64) -> Severity {
        if days_left < 0 {
            Severity::Outdated
        } else if days_left <= self.critical_max_days {
            Severity::Critical
        } else if days_left <= self.warning_max_days {
            Severity::Warning
        } else {
            Severity::Neutral
        }
    }

    pub fn classify_days(&self, days_left: i64) -> ExpiryStatus {
        ExpiryStatus {
            days_left,
            severity: self.severity_for(days_left),
            text: expiry_text(days_left),
        }
    }

    pub fn classify(&self, expiry: NaiveDate, today: NaiveDate) -> ExpiryStatus {
        self.classify_days(days_until_expiry(expiry, today))
    }

    /// Same as [`ExpiryPolicy::classify`]; the time of day in `now` is ignored.
    pub fn classify_at(&self, expiry: NaiveDate, now: NaiveDateTime) -> ExpiryStatus {
        self.classify(expiry, now.date())
    }

    pub fn classify_str(&self, expiry: &str, today: NaiveDate) -> Result<ExpiryStatus> {
        let date = parse_expiry(expiry)?;
        Ok(self.classify(date, today))
    }
}
