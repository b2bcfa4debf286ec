//! Canonical JSON wire form for [`TokenRecord`].
//!
//! Recognized keys map onto named fields; every other key is carried verbatim
//! in `additional_data`. Timestamps travel as RFC 3339 strings so a decoded
//! record encodes and decodes back to an equal value.
//!
//! `created_on` and `expires_on` are named fields, not extras. A provider
//! that sends its own value under either key must use RFC 3339 or integer
//! epoch seconds; any other shape (e.g. `"2024-01-01 10:00"`) fails with
//! [`TokenError::TypeMismatch`] instead of landing in `additional_data`.
//! Timestamps are limited to years 0001 through 9999, the range RFC 3339
//! can represent.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::record::{checked_expiry, clamp_to_wire_range, within_wire_range, TokenRecord};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TokenError};

pub const ACCESS_TOKEN: &str = "accessToken";
pub const REFRESH_TOKEN: &str = "refreshToken";
pub const ID_TOKEN: &str = "id_token";
pub const EXPIRES_IN: &str = "expires_in";
pub const SCOPE: &str = "scope";
pub const TOKEN_TYPE: &str = "token_type";
pub const CREATED_ON: &str = "created_on";
pub const EXPIRES_ON: &str = "expires_on";

const WIRE_KEYS: [&str; 8] = [
    ACCESS_TOKEN,
    REFRESH_TOKEN,
    ID_TOKEN,
    EXPIRES_IN,
    SCOPE,
    TOKEN_TYPE,
    CREATED_ON,
    EXPIRES_ON,
];

/// Whether `key` maps to a named field rather than `additional_data`.
pub fn is_wire_key(key: &str) -> bool {
    WIRE_KEYS.contains(&key)
}

/// Decodes and encodes token records, stamping `created_on` from a [`Clock`].
///
/// # Example
/// ```
/// use token_info::token::WireCodec;
///
/// let codec = WireCodec::new();
/// let token = codec
///     .decode_str(r#"{"accessToken":"a1b2c3d4","expires_in":7200,"grant_id":"b49cf0c8add0"}"#)
///     .unwrap();
/// assert_eq!(token.access_token(), "a1b2c3d4");
/// assert!(token.additional_value("grant_id").is_some());
/// ```
#[derive(Clone)]
pub struct WireCodec {
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for WireCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireCodec").finish_non_exhaustive()
    }
}

impl Default for WireCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl WireCodec {
    /// Codec backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn decode_str(&self, input: &str) -> Result<TokenRecord> {
        let value: Value = serde_json::from_str(input)?;
        self.decode_value(value)
    }

    pub fn decode_slice(&self, input: &[u8]) -> Result<TokenRecord> {
        let value: Value = serde_json::from_slice(input)?;
        self.decode_value(value)
    }

    /// Decode an already-parsed JSON value. The root must be an object.
    pub fn decode_value(&self, value: Value) -> Result<TokenRecord> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(TokenError::Parse(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut access_token = String::new();
        let mut refresh_token = None;
        let mut id_token = None;
        let mut expires_in = 0;
        let mut scope = String::new();
        let mut token_type = String::new();
        let mut created_on = None;
        let mut expires_on = None;
        let mut additional_data = BTreeMap::new();

        for (key, value) in object {
            match key.as_str() {
                ACCESS_TOKEN => access_token = string_field(ACCESS_TOKEN, value)?,
                REFRESH_TOKEN => refresh_token = optional_string_field(REFRESH_TOKEN, value)?,
                ID_TOKEN => id_token = optional_string_field(ID_TOKEN, value)?,
                EXPIRES_IN => expires_in = integer_field(EXPIRES_IN, &value)?,
                SCOPE => scope = string_field(SCOPE, value)?,
                TOKEN_TYPE => token_type = string_field(TOKEN_TYPE, value)?,
                CREATED_ON => created_on = Some(timestamp_field(CREATED_ON, &value)?),
                EXPIRES_ON => expires_on = Some(timestamp_field(EXPIRES_ON, &value)?),
                _ => {
                    additional_data.insert(key, value);
                }
            }
        }

        let created_on = created_on.unwrap_or_else(|| clamp_to_wire_range(self.clock.now()));
        let expires_on = match expires_on {
            Some(expires_on) => expires_on,
            None => checked_expiry(created_on, expires_in)
                .ok_or_else(|| TokenError::type_mismatch(EXPIRES_IN, "a representable lifetime"))?,
        };

        tracing::debug!(
            additional_fields = additional_data.len(),
            has_refresh_token = refresh_token.is_some(),
            has_id_token = id_token.is_some(),
            "decoded token record"
        );

        Ok(TokenRecord {
            access_token,
            refresh_token,
            id_token,
            created_on,
            expires_in,
            expires_on,
            scope,
            token_type,
            additional_data,
        })
    }

    pub fn encode(&self, token: &TokenRecord) -> Value {
        encode(token)
    }

    pub fn encode_string(&self, token: &TokenRecord) -> Result<String> {
        Ok(serde_json::to_string(&encode(token))?)
    }
}

/// Encode a record into its wire object.
///
/// Absent refresh and ID tokens are omitted rather than written as `null`.
pub fn encode(token: &TokenRecord) -> Value {
    let mut object = Map::new();
    object.insert(ACCESS_TOKEN.into(), Value::String(token.access_token.clone()));
    if let Some(refresh_token) = &token.refresh_token {
        object.insert(REFRESH_TOKEN.into(), Value::String(refresh_token.clone()));
    }
    if let Some(id_token) = &token.id_token {
        object.insert(ID_TOKEN.into(), Value::String(id_token.clone()));
    }
    object.insert(EXPIRES_IN.into(), Value::from(token.expires_in));
    object.insert(SCOPE.into(), Value::String(token.scope.clone()));
    object.insert(TOKEN_TYPE.into(), Value::String(token.token_type.clone()));
    object.insert(CREATED_ON.into(), Value::String(wire_timestamp(token.created_on)));
    object.insert(EXPIRES_ON.into(), Value::String(wire_timestamp(token.expires_on)));
    for (key, value) in &token.additional_data {
        object.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(object)
}

fn wire_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn string_field(field: &'static str, value: Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(TokenError::type_mismatch(field, "a string")),
    }
}

fn optional_string_field(field: &'static str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        _ => Err(TokenError::type_mismatch(field, "a string or null")),
    }
}

fn integer_field(field: &'static str, value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| TokenError::type_mismatch(field, "an integer"))
}

fn timestamp_field(field: &'static str, value: &Value) -> Result<DateTime<Utc>> {
    const EXPECTED: &str = "an RFC 3339 timestamp or integer epoch seconds in years 0001-9999";
    let parsed = match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|instant| instant.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0)),
        _ => None,
    };
    parsed
        .filter(|instant| within_wire_range(*instant))
        .ok_or_else(|| TokenError::type_mismatch(field, EXPECTED))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for TokenRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TokenRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        WireCodec::new()
            .decode_value(value)
            .map_err(serde::de::Error::custom)
    }
}
