//! Configuration (layered: code > env > defaults).

use std::sync::OnceLock;

use crate::error::{Result, TokenError};
use crate::token::{DisplayOptions, TimestampFormat, DEFAULT_REFRESH_MARGIN_SECS};

pub const REFRESH_MARGIN_ENV: &str = "TOKEN_INFO_REFRESH_MARGIN_SECS";
pub const TIMESTAMP_FORMAT_ENV: &str = "TOKEN_INFO_TIMESTAMP_FORMAT";

/// Global default config (lazy-initialized from env).
static DEFAULT_CONFIG: OnceLock<TokenConfig> = OnceLock::new();

/// Tunables for refresh timing and display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    /// Seconds before expiry at which a token counts as due.
    pub refresh_margin_secs: i64,
    pub timestamp_format: TimestampFormat,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl TokenConfig {
    pub fn with_refresh_margin_secs(mut self, margin_secs: i64) -> Self {
        self.refresh_margin_secs = margin_secs;
        self
    }

    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions::builder()
            .timestamp_format(self.timestamp_format)
            .build()
    }

    /// Load from environment variables (and `.env` if present).
    ///
    /// Malformed values are logged and the defaults are used instead.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid token configuration, using defaults");
            Self::default()
        })
    }

    /// Like [`Self::from_env`] but malformed values are errors.
    pub fn try_from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::try_from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            refresh_margin_secs: parse_margin(lookup(REFRESH_MARGIN_ENV))?
                .unwrap_or(defaults.refresh_margin_secs),
            timestamp_format: parse_format(lookup(TIMESTAMP_FORMAT_ENV))?
                .unwrap_or(defaults.timestamp_format),
        })
    }

    /// Get (or create) the global default config.
    pub fn global() -> &'static TokenConfig {
        DEFAULT_CONFIG.get_or_init(Self::from_env)
    }
}

fn parse_margin(raw: Option<String>) -> Result<Option<i64>> {
    raw.map(|value| {
        value.trim().parse::<i64>().map_err(|_| {
            TokenError::Configuration(format!(
                "{REFRESH_MARGIN_ENV} must be an integer number of seconds, got {value:?}"
            ))
        })
    })
    .transpose()
}

fn parse_format(raw: Option<String>) -> Result<Option<TimestampFormat>> {
    raw.map(|value| {
        value.trim().parse::<TimestampFormat>().map_err(|_| {
            TokenError::Configuration(format!(
                "{TIMESTAMP_FORMAT_ENV} must be epoch_seconds or human_readable, got {value:?}"
            ))
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = TokenConfig::try_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, TokenConfig::default());
        assert_eq!(config.refresh_margin_secs, DEFAULT_REFRESH_MARGIN_SECS);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = TokenConfig::try_from_lookup(lookup_from(&[
            (REFRESH_MARGIN_ENV, " 300 "),
            (TIMESTAMP_FORMAT_ENV, "human_readable"),
        ]))
        .unwrap();
        assert_eq!(config.refresh_margin_secs, 300);
        assert_eq!(config.timestamp_format, TimestampFormat::HumanReadable);
        assert_eq!(
            config.display_options(),
            DisplayOptions::human_readable(true)
        );
    }

    #[test]
    fn malformed_margin_is_a_configuration_error() {
        let err = TokenConfig::try_from_lookup(lookup_from(&[(REFRESH_MARGIN_ENV, "soon")]))
            .unwrap_err();
        assert!(matches!(err, TokenError::Configuration(_)));
    }

    #[test]
    fn unknown_format_is_a_configuration_error() {
        let err = TokenConfig::try_from_lookup(lookup_from(&[(TIMESTAMP_FORMAT_ENV, "locale")]))
            .unwrap_err();
        assert!(err.to_string().contains(TIMESTAMP_FORMAT_ENV));
    }

    #[test]
    fn builder_style_overrides() {
        let config = TokenConfig::default()
            .with_refresh_margin_secs(5)
            .with_timestamp_format(TimestampFormat::HumanReadable);
        assert_eq!(config.refresh_margin_secs, 5);
        assert_eq!(config.timestamp_format, TimestampFormat::HumanReadable);
    }
}
