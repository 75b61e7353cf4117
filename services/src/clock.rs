//! Time source for server-assigned attendance timestamps.
//!
//! Marks are stamped at a fixed UTC+7 offset (WIB) regardless of the host's
//! local zone.

use chrono::{DateTime, FixedOffset, Utc};

/// Offset of Western Indonesian Time from UTC.
pub const WIB_OFFSET_SECONDS: i32 = 7 * 3600;

pub fn wib() -> FixedOffset {
    FixedOffset::east_opt(WIB_OFFSET_SECONDS).expect("UTC+7 is a valid offset")
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock, converted to WIB.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&wib())
    }
}

/// Always returns the same instant. For tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Pins the clock to `at`, re-expressed in WIB.
    pub fn at<Tz: chrono::TimeZone>(at: DateTime<Tz>) -> Self {
        FixedClock(at.with_timezone(&wib()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
