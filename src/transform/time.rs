//! Calendar decomposition of event timestamps.

use crate::error::EtlError;
use crate::warehouse::TimeBucket;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Unit of a raw epoch timestamp.
///
/// Activity logs carry milliseconds, the log loader only ever passes
/// [`TimestampUnit::Milliseconds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampUnit {
    Seconds,
    Milliseconds,
}

/// Smallest accepted millisecond timestamp, 1973-03-03T09:46:40Z.
///
/// Every second-resolution timestamp up to the year 5138 lies below it, so a
/// seconds value passed as milliseconds is rejected instead of landing in 1970.
pub const MIN_EPOCH_MILLIS: i64 = 100_000_000_000;

impl TimestampUnit {
    fn to_millis(self, value: i64) -> Option<i64> {
        match self {
            TimestampUnit::Seconds => value.checked_mul(1000),
            TimestampUnit::Milliseconds => Some(value),
        }
    }
}

impl TimeBucket {
    /// Derives the time dimension row of `value`, interpreted in `unit`.
    ///
    /// The bucket is keyed by the timestamp in epoch milliseconds and split in
    /// UTC. Weekdays count from Monday = 0, weeks follow ISO 8601.
    pub fn derive(value: i64, unit: TimestampUnit) -> Result<TimeBucket, EtlError> {
        let invalid = |reason: &str| EtlError::InvalidTimestamp {
            value,
            reason: reason.to_string(),
        };

        if unit == TimestampUnit::Milliseconds && value < MIN_EPOCH_MILLIS {
            return Err(invalid("too small for epoch milliseconds, is it in seconds?"));
        }
        let millis = unit
            .to_millis(value)
            .ok_or_else(|| invalid("out of range"))?;
        let time: DateTime<Utc> =
            DateTime::from_timestamp_millis(millis).ok_or_else(|| invalid("out of range"))?;

        Ok(TimeBucket {
            start_time: millis,
            hour: time.hour() as i32,
            day: time.day() as i32,
            week: time.iso_week().week() as i32,
            month: time.month() as i32,
            year: time.year(),
            weekday: time.weekday().num_days_from_monday() as i32,
        })
    }
}
