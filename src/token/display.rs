//! Presentation view of a token record for logs and debugging screens.
//!
//! This projection is write-only. Its keys and timestamp shapes differ from
//! the wire form and it must not be fed back into [`super::WireCodec`].

use bon::Builder;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use super::record::TokenRecord;
use crate::error::{Result, TokenError};

/// How `createdOn` and `expiresOn` are rendered.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimestampFormat {
    /// Integer seconds since the Unix epoch.
    #[default]
    EpochSeconds,
    /// RFC 3339 in UTC at second precision, e.g. `2026-10-16T08:30:00Z`.
    HumanReadable,
}

/// Options for [`TokenRecord::to_json_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Builder)]
pub struct DisplayOptions {
    #[builder(default)]
    pub timestamp_format: TimestampFormat,
}

impl DisplayOptions {
    /// Options from the boolean switch used by callers of `to_json`.
    pub fn human_readable(human_readable: bool) -> Self {
        let timestamp_format = if human_readable {
            TimestampFormat::HumanReadable
        } else {
            TimestampFormat::EpochSeconds
        };
        Self { timestamp_format }
    }
}

impl TokenRecord {
    /// Project with epoch-second timestamps.
    pub fn to_json(&self) -> Value {
        self.to_json_with(DisplayOptions::default())
    }

    pub fn to_json_with(&self, options: DisplayOptions) -> Value {
        let mut object = Map::new();
        object.insert("accessToken".into(), Value::String(self.access_token.clone()));
        if let Some(refresh_token) = &self.refresh_token {
            object.insert("refreshToken".into(), Value::String(refresh_token.clone()));
        }
        if let Some(id_token) = &self.id_token {
            object.insert("idToken".into(), Value::String(id_token.clone()));
        }
        object.insert(
            "createdOn".into(),
            display_timestamp(self.created_on, options.timestamp_format),
        );
        object.insert("expiresIn".into(), Value::from(self.expires_in));
        object.insert(
            "expiresOn".into(),
            display_timestamp(self.expires_on, options.timestamp_format),
        );
        object.insert("scope".into(), Value::String(self.scope.clone()));
        object.insert("tokenType".into(), Value::String(self.token_type.clone()));
        object.insert(
            "additionalData".into(),
            Value::Object(self.additional_data.clone().into_iter().collect()),
        );
        Value::Object(object)
    }

    /// Pretty-printed projection text.
    pub fn to_json_string(&self, options: DisplayOptions) -> Result<String> {
        serde_json::to_string_pretty(&self.to_json_with(options))
            .map_err(|err| TokenError::Projection(err.to_string()))
    }
}

fn display_timestamp(instant: DateTime<Utc>, format: TimestampFormat) -> Value {
    match format {
        TimestampFormat::EpochSeconds => Value::from(instant.timestamp()),
        TimestampFormat::HumanReadable => {
            Value::String(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
        }
    }
}
