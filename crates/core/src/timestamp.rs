//! Microsecond-precision transaction timestamp
//!
//! Every ledger transaction carries one timestamp, chosen by the submitter and
//! identical for every read within the transaction. Products record it as
//! `created_at` / `updated_at`.
//!
//! ## Precision
//!
//! Timestamps are stored as microseconds since Unix epoch (1970-01-01 00:00:00 UTC).
//! On the wire they are RFC 3339 strings in UTC with microsecond precision, so
//! off-ledger tooling can read them without this crate:
//!
//! ```
//! use supplychain_core::Timestamp;
//!
//! let ts = Timestamp::from_secs(1_700_000_000);
//! assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20.000000Z");
//! assert_eq!(Timestamp::parse_rfc3339(&ts.to_rfc3339()).unwrap(), ts);
//! ```
//!
//! RFC 3339 has four-digit years, so serialization fails for instants after
//! [`Timestamp::MAX_RFC3339`] rather than writing a string no reader accepts.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Microsecond-precision timestamp
///
/// ## Invariants
///
/// - Timestamps are always non-negative (u64)
/// - Timestamps are comparable and orderable
/// - The zero timestamp represents Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Latest instant with an RFC 3339 form (9999-12-31T23:59:59.999999Z)
    pub const MAX_RFC3339: Timestamp = Timestamp(253_402_300_799_999_999);

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a timestamp for the current moment
    ///
    /// Returns epoch (0) if the system clock is before Unix epoch.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Parse an RFC 3339 string (any offset, any sub-second precision)
    ///
    /// Sub-microsecond digits are truncated. Instants before Unix epoch are
    /// rejected.
    pub fn parse_rfc3339(s: &str) -> Result<Self, String> {
        let parsed = DateTime::parse_from_rfc3339(s)
            .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", s, e))?;
        let micros = parsed.timestamp_micros();
        if micros < 0 {
            return Err(format!("timestamp '{}' is before Unix epoch", s));
        }
        Ok(Timestamp(micros as u64))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get seconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Whether this instant has an RFC 3339 form
    #[inline]
    pub const fn is_rfc3339_representable(&self) -> bool {
        self.0 <= Self::MAX_RFC3339.0
    }

    /// Render as RFC 3339 in UTC with microsecond precision
    ///
    /// For display only past [`MAX_RFC3339`](Self::MAX_RFC3339): the result
    /// has a five-digit or clamped year and does not parse back.
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime()
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn to_datetime(self) -> DateTime<Utc> {
        // Beyond chrono's range (~262k years) clamps to its maximum
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::from_timestamp_micros)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Add a duration to this timestamp, saturating on overflow
    pub fn saturating_add(&self, duration: Duration) -> Self {
        Timestamp(self.0.saturating_add(duration.as_micros() as u64))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl From<u64> for Timestamp {
    fn from(micros: u64) -> Self {
        Timestamp::from_micros(micros)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_rfc3339_representable() {
            return Err(serde::ser::Error::custom(format!(
                "timestamp {}us is past year 9999 and has no RFC 3339 form",
                self.0
            )));
        }
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}
