//! Time source used when decoding records and evaluating refresh timing.

use std::fmt;

use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// Decoding stamps `created_on` from a clock and the refresh predicate compares
/// against one, so tests can pin "now" with [`FixedClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use token_info::clock::{Clock, FixedClock};
///
/// let instant = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
/// let clock = FixedClock::new(instant);
/// assert_eq!(clock.now(), instant);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// A clock pinned `seconds` after this one.
    pub fn advanced_by(&self, seconds: i64) -> Self {
        Self {
            instant: self.instant + chrono::Duration::seconds(seconds),
        }
    }
}

impl fmt::Debug for FixedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedClock")
            .field(&self.instant.to_rfc3339())
            .finish()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
