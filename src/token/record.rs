use std::collections::BTreeMap;
use std::fmt;

use bon::bon;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use super::codec::is_wire_key;
use crate::clock::{Clock, SystemClock};

/// OAuth token payload plus expiry metadata and provider-specific extras.
///
/// Records are immutable once built; `Clone` produces an equal copy.
///
/// # Example
/// ```
/// use token_info::token::TokenRecord;
///
/// let token = TokenRecord::builder()
///     .access_token("a1b2c3d4")
///     .refresh_token("h5j6i7k8")
///     .expires_in(7200)
///     .scope("name age")
///     .token_type("Bearer")
///     .build();
/// assert_eq!(token.access_token(), "a1b2c3d4");
/// assert_eq!((token.expires_on() - token.created_on()).num_seconds(), 7200);
/// ```
#[derive(Clone, PartialEq)]
pub struct TokenRecord {
    pub(super) access_token: String,
    pub(super) refresh_token: Option<String>,
    pub(super) id_token: Option<String>,
    pub(super) created_on: DateTime<Utc>,
    pub(super) expires_in: i64,
    pub(super) expires_on: DateTime<Utc>,
    pub(super) scope: String,
    pub(super) token_type: String,
    pub(super) additional_data: BTreeMap<String, Value>,
}

#[bon]
impl TokenRecord {
    /// Build a record from explicit field values.
    ///
    /// `created_on` defaults to the system clock and `expires_on` to
    /// `created_on + expires_in`. Both are clamped to years 0001 through 9999.
    /// Extra keys that shadow a named field are dropped from `additional_data`.
    #[builder]
    pub fn new(
        #[builder(default, into)] access_token: String,
        #[builder(into)] refresh_token: Option<String>,
        #[builder(into)] id_token: Option<String>,
        created_on: Option<DateTime<Utc>>,
        #[builder(default)] expires_in: i64,
        expires_on: Option<DateTime<Utc>>,
        #[builder(default, into)] scope: String,
        #[builder(default, into)] token_type: String,
        #[builder(default)] additional_data: BTreeMap<String, Value>,
    ) -> Self {
        let created_on = clamp_to_wire_range(created_on.unwrap_or_else(|| SystemClock.now()));
        let expires_on = clamp_to_wire_range(
            expires_on.unwrap_or_else(|| saturating_expiry(created_on, expires_in)),
        );
        Self {
            access_token,
            refresh_token,
            id_token,
            created_on,
            expires_in,
            expires_on,
            scope,
            token_type,
            additional_data: without_wire_keys(additional_data),
        }
    }
}

impl TokenRecord {
    /// A record carrying only provider extras; every named field is defaulted.
    pub fn from_additional_data(additional_data: BTreeMap<String, Value>) -> Self {
        Self::builder().additional_data(additional_data).build()
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }

    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    /// Lifetime in seconds as issued by the provider.
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    pub fn expires_on(&self) -> DateTime<Utc> {
        self.expires_on
    }

    /// Space-delimited scope list, unparsed.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Wire fields that did not map to a named attribute.
    pub fn additional_data(&self) -> &BTreeMap<String, Value> {
        &self.additional_data
    }

    /// Look up a single provider extra, e.g. `grant_id`.
    pub fn additional_value(&self, key: &str) -> Option<&Value> {
        self.additional_data.get(key)
    }

    /// Whether `instant` is at or past the absolute expiry.
    pub fn is_expired_at(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.expires_on
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &redact(Some(&self.access_token)))
            .field("refresh_token", &redact(self.refresh_token.as_ref()))
            .field("id_token", &redact(self.id_token.as_ref()))
            .field("created_on", &self.created_on)
            .field("expires_in", &self.expires_in)
            .field("expires_on", &self.expires_on)
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("additional_data", &self.additional_data)
            .finish()
    }
}

fn redact(secret: Option<&String>) -> Option<&'static str> {
    secret.map(|value| if value.is_empty() { "" } else { ".." })
}

/// Earliest epoch second with a four-digit year (`0001-01-01T00:00:00Z`).
const EARLIEST_WIRE_EPOCH: i64 = -62_135_596_800;
/// Latest epoch second with a four-digit year (`9999-12-31T23:59:59Z`).
const LATEST_WIRE_EPOCH: i64 = 253_402_300_799;

/// Whether `instant` renders in RFC 3339 with a four-digit year.
pub(crate) fn within_wire_range(instant: DateTime<Utc>) -> bool {
    (EARLIEST_WIRE_EPOCH..=LATEST_WIRE_EPOCH).contains(&instant.timestamp())
}

pub(crate) fn earliest_wire_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(EARLIEST_WIRE_EPOCH, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub(crate) fn latest_wire_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(LATEST_WIRE_EPOCH, 999_999_999).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub(crate) fn clamp_to_wire_range(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.clamp(earliest_wire_instant(), latest_wire_instant())
}

/// `created_on + expires_in`, or `None` when it leaves years 0001 through 9999.
pub(crate) fn checked_expiry(
    created_on: DateTime<Utc>,
    expires_in: i64,
) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| created_on.checked_add_signed(lifetime))
        .filter(|expires_on| within_wire_range(*expires_on))
}

fn saturating_expiry(created_on: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    checked_expiry(created_on, expires_in).unwrap_or_else(|| {
        if expires_in < 0 {
            earliest_wire_instant()
        } else {
            latest_wire_instant()
        }
    })
}

fn without_wire_keys(mut additional_data: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    additional_data.retain(|key, _| {
        let shadowed = is_wire_key(key);
        if shadowed {
            tracing::warn!(key = %key, "dropping additional field that shadows a named field");
        }
        !shadowed
    });
    additional_data
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn additional_data_only_defaults_named_fields() {
        let token = TokenRecord::from_additional_data(BTreeMap::new());
        assert_eq!(token.access_token(), "");
        assert_eq!(token.refresh_token(), None);
        assert_eq!(token.id_token(), None);
        assert_eq!(token.expires_in(), 0);
        assert_eq!(token.scope(), "");
        assert_eq!(token.token_type(), "");
        assert_eq!(token.created_on(), token.expires_on());
        assert!(token.additional_data().is_empty());
    }

    #[test]
    fn builder_keeps_explicit_values() {
        let expires_on = issued_at() + Duration::seconds(5);
        let token = TokenRecord::builder()
            .access_token("accessToken")
            .refresh_token("refreshToken")
            .id_token("ey...")
            .created_on(issued_at())
            .expires_in(60)
            .expires_on(expires_on)
            .scope("scope")
            .token_type("type")
            .build();

        assert_eq!(token.access_token(), "accessToken");
        assert_eq!(token.id_token(), Some("ey..."));
        assert_eq!(token.expires_in(), 60);
        assert_eq!(token.expires_on(), expires_on);
    }

    #[test]
    fn builder_derives_expiry_from_lifetime() {
        let token = TokenRecord::builder()
            .created_on(issued_at())
            .expires_in(7200)
            .build();
        assert_eq!(token.expires_on(), issued_at() + Duration::hours(2));
    }

    #[test]
    fn builder_saturates_out_of_range_lifetime() {
        let token = TokenRecord::builder()
            .created_on(issued_at())
            .expires_in(i64::MAX)
            .build();
        assert_eq!(token.expires_on(), latest_wire_instant());
        assert_eq!(token.expires_on().timestamp(), 253_402_300_799);

        let token = TokenRecord::builder()
            .created_on(issued_at())
            .expires_in(300_000_000_000)
            .build();
        assert_eq!(token.expires_on(), latest_wire_instant());

        let token = TokenRecord::builder()
            .created_on(issued_at())
            .expires_in(i64::MIN)
            .build();
        assert_eq!(token.expires_on(), earliest_wire_instant());
    }

    #[test]
    fn builder_clamps_explicit_timestamps() {
        let token = TokenRecord::builder()
            .created_on(DateTime::<Utc>::MIN_UTC)
            .expires_on(DateTime::<Utc>::MAX_UTC)
            .build();
        assert_eq!(token.created_on(), earliest_wire_instant());
        assert_eq!(token.expires_on(), latest_wire_instant());
        assert!(within_wire_range(token.created_on()));
        assert!(within_wire_range(token.expires_on()));
    }

    #[test]
    fn shadowing_extras_are_dropped() {
        let mut extras = BTreeMap::new();
        extras.insert("scope".to_string(), json!("admin"));
        extras.insert("grant_id".to_string(), json!("b49cf0c8add0"));
        let token = TokenRecord::from_additional_data(extras);

        assert_eq!(token.scope(), "");
        assert_eq!(token.additional_data().len(), 1);
        assert_eq!(token.additional_value("grant_id"), Some(&json!("b49cf0c8add0")));
    }

    #[test]
    fn clone_is_structurally_equal() {
        let mut extras = BTreeMap::new();
        extras.insert("nested".to_string(), json!({"a": [1, 2, 3]}));
        let token = TokenRecord::builder()
            .access_token("a")
            .created_on(issued_at())
            .additional_data(extras)
            .build();
        assert!(token == token.clone());
    }

    #[test]
    fn records_differing_only_in_extras_are_unequal() {
        let plain = TokenRecord::builder().created_on(issued_at()).build();
        let mut extras = BTreeMap::new();
        extras.insert("grant_id".to_string(), json!("x"));
        let with_extra = TokenRecord::builder()
            .created_on(issued_at())
            .additional_data(extras)
            .build();
        assert!(plain != with_extra);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let token = TokenRecord::builder()
            .access_token("super-secret")
            .refresh_token("also-secret")
            .created_on(issued_at())
            .build();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("also-secret"));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let token = TokenRecord::builder()
            .created_on(issued_at())
            .expires_in(10)
            .build();
        assert!(!token.is_expired_at(issued_at() + Duration::seconds(9)));
        assert!(token.is_expired_at(issued_at() + Duration::seconds(10)));
    }
}
