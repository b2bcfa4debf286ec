//! token-info — OAuth token records
//!
//! Holds an access token with its optional refresh and ID tokens, expiry
//! metadata and any provider-specific fields. Records decode from and encode
//! to a tolerant JSON wire form, project into a display view with either
//! epoch-second or human-readable timestamps, and answer whether they are
//! due for refresh.
//!
//! # Quick Start
//!
//! ```
//! use token_info::prelude::*;
//!
//! # fn example() -> token_info::error::Result<()> {
//! let token = WireCodec::new().decode_str(
//!     r#"{"token_type":"Bearer","accessToken":"a1b2c3d4","expires_in":7200,"grant_id":"b49cf0c8add0"}"#,
//! )?;
//! assert!(!token.should_refresh());
//! println!("{}", token.to_json_string(DisplayOptions::human_readable(true))?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod prelude;
pub mod token;
