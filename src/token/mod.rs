//! Token record model, wire codec, display projection and refresh timing.

pub mod codec;
pub mod display;
pub mod envelope;
pub mod record;
pub mod refresh;

pub use codec::WireCodec;
pub use display::{DisplayOptions, TimestampFormat};
pub use envelope::TransferEnvelope;
pub use record::TokenRecord;
pub use refresh::DEFAULT_REFRESH_MARGIN_SECS;
