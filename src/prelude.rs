//! Convenience re-exports for common use.

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::TokenConfig;
pub use crate::error::{Result, TokenError};
pub use crate::token::{
    DisplayOptions, TimestampFormat, TokenRecord, TransferEnvelope, WireCodec,
    DEFAULT_REFRESH_MARGIN_SECS,
};
