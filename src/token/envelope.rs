//! Versioned envelope for handing a token record to another process.
//!
//! The envelope wraps the wire form, so everything the codec preserves
//! (ID token, provider extras, exact timestamps) survives the hop.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec::{self, WireCodec};
use super::record::TokenRecord;
use crate::error::{Result, TokenError};

const ENVELOPE_VERSION: u32 = 1;

/// Serialized container for one token record.
///
/// # Example
/// ```
/// use token_info::token::{TokenRecord, TransferEnvelope};
///
/// let token = TokenRecord::builder().access_token("a1b2c3d4").id_token("ey...").build();
/// let text = TransferEnvelope::seal(&token).to_base64().unwrap();
/// let restored = TransferEnvelope::from_base64(&text).unwrap().open().unwrap();
/// assert!(restored == token);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferEnvelope {
    version: u32,
    token: Value,
}

impl TransferEnvelope {
    pub fn seal(token: &TokenRecord) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            token: codec::encode(token),
        }
    }

    /// Reconstruct the record.
    ///
    /// The sealed payload always carries `created_on`, so the codec's clock
    /// is never consulted here.
    pub fn open(&self) -> Result<TokenRecord> {
        WireCodec::new().decode_value(self.token.clone())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| TokenError::Envelope(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let envelope: Self =
            serde_json::from_slice(bytes).map_err(|err| TokenError::Envelope(err.to_string()))?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(TokenError::Envelope(format!(
                "unsupported envelope version {}",
                envelope.version
            )));
        }
        tracing::debug!(version = envelope.version, "opened token transfer envelope");
        Ok(envelope)
    }

    /// URL-safe base64 text of [`Self::to_bytes`], for string-only channels.
    pub fn to_base64(&self) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(self.to_bytes()?))
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(text.trim())?;
        Self::from_bytes(&bytes)
    }
}
