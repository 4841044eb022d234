//! Drug-withdrawal window arithmetic.
//!
//! A treatment starts a withdrawal period during which products from the
//! animal must not be used. The window ends `milk_withdrawal_hours` after
//! administration. Status is always derived from "now" and never stored.
//!
//! All arithmetic is on UTC instants. Millisecond precision is kept so that
//! the day countdown matches the stored timestamps exactly.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Milliseconds in one day, the unit of the clearance countdown.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Withdrawal errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WithdrawalError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

pub type WithdrawalResult<T> = Result<T, WithdrawalError>;

/// Whether an animal's products are usable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WithdrawalStatus {
    /// The withdrawal window has passed.
    Clear,
    /// Still inside the withdrawal window.
    InWithdrawal,
}

impl WithdrawalStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WithdrawalStatus::Clear => "Clear",
            WithdrawalStatus::InWithdrawal => "In Withdrawal",
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, WithdrawalStatus::Clear)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Add `withdrawal_hours` whole hours to the treatment time.
///
/// Saturates at the largest representable instant instead of overflowing.
pub fn compute_withdrawal_end(treatment_time: DateTime<Utc>, withdrawal_hours: u32) -> DateTime<Utc> {
    treatment_time
        .checked_add_signed(Duration::hours(i64::from(withdrawal_hours)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `Clear` only once `now` is strictly past the end; the end instant itself
/// is still in withdrawal.
pub fn classify_status(withdrawal_end: DateTime<Utc>, now: DateTime<Utc>) -> WithdrawalStatus {
    if now > withdrawal_end {
        WithdrawalStatus::Clear
    } else {
        WithdrawalStatus::InWithdrawal
    }
}

/// Whole days until clearance, rounded up.
///
/// Zero or negative once the window has passed; see [`display_days_left`].
pub fn days_remaining(withdrawal_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let gap = withdrawal_end.signed_duration_since(now);
    // num_milliseconds truncates toward zero; round a positive remainder up
    let mut ms = gap.num_milliseconds();
    if gap > Duration::milliseconds(ms) {
        ms = ms.saturating_add(1);
    }
    // ceil(ms / day) for either sign
    -((-ms).div_euclid(MS_PER_DAY))
}

/// Countdown suitable for display: never below zero.
pub fn display_days_left(days: i64) -> i64 {
    days.max(0)
}

/// Status and countdown of one withdrawal window at a given instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalSnapshot {
    pub status: WithdrawalStatus,
    /// Raw countdown (may be negative)
    pub days_remaining: i64,
    pub withdrawal_end: DateTime<Utc>,
}

impl WithdrawalSnapshot {
    /// Clamped countdown.
    pub fn days_left(&self) -> i64 {
        display_days_left(self.days_remaining)
    }
}

/// Evaluate a window end against `now`.
pub fn snapshot(withdrawal_end: DateTime<Utc>, now: DateTime<Utc>) -> WithdrawalSnapshot {
    WithdrawalSnapshot {
        status: classify_status(withdrawal_end, now),
        days_remaining: days_remaining(withdrawal_end, now),
        withdrawal_end,
    }
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and bare `YYYY-MM-DD` dates (taken as midnight UTC).
pub fn parse_timestamp(value: &str) -> WithdrawalResult<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| WithdrawalError::InvalidTimestamp(value.to_string()))
}

/// Format an instant the way records store it (millisecond precision, `Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// String-in, string-out form of [`compute_withdrawal_end`].
pub fn withdrawal_end_for(treatment_date: &str, withdrawal_hours: u32) -> WithdrawalResult<String> {
    let start = parse_timestamp(treatment_date)?;
    Ok(format_timestamp(compute_withdrawal_end(start, withdrawal_hours)))
}
