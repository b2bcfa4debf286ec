use chrono::{DateTime, Duration, Utc};

use super::record::TokenRecord;
use crate::clock::{Clock, SystemClock};
use crate::config::TokenConfig;

/// Seconds before `expires_on` at which a token is treated as due.
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 60;

impl TokenRecord {
    /// Whether the token is due for refresh, using the default margin.
    pub fn should_refresh(&self) -> bool {
        self.should_refresh_with_margin(DEFAULT_REFRESH_MARGIN_SECS)
    }

    pub fn should_refresh_with_margin(&self, margin_secs: i64) -> bool {
        self.should_refresh_with_clock(&SystemClock, margin_secs)
    }

    pub fn should_refresh_with_clock(&self, clock: &dyn Clock, margin_secs: i64) -> bool {
        self.should_refresh_at(clock.now(), margin_secs)
    }

    /// Refresh timing driven by a [`TokenConfig`].
    pub fn should_refresh_with_config(&self, config: &TokenConfig, clock: &dyn Clock) -> bool {
        self.should_refresh_at(clock.now(), config.refresh_margin_secs)
    }

    /// True when `now >= expires_on - margin_secs`.
    ///
    /// A negative margin marks the token as due regardless of how much
    /// lifetime remains.
    pub fn should_refresh_at(&self, now: DateTime<Utc>, margin_secs: i64) -> bool {
        if margin_secs < 0 {
            return true;
        }
        let threshold = Duration::try_seconds(margin_secs)
            .and_then(|margin| self.expires_on.checked_sub_signed(margin))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        now >= threshold
    }
}
