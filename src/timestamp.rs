//! Server timestamps

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// A timestamp sent by the API.
///
/// The backend emits naive ISO-8601 values (`2024-05-01T09:30:00`) for most
/// columns and RFC 3339 values for a few; both are accepted and naive values
/// are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Parse either an RFC 3339 or a naive ISO-8601 timestamp
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(parsed.with_timezone(&Utc)));
        }
        raw.parse::<NaiveDateTime>()
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }
}

impl Deref for Timestamp {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_naive_and_offset_values() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        assert_eq!(Timestamp::parse("2024-05-01T09:30:00").map(|t| t.0), Some(expected));
        assert_eq!(Timestamp::parse("2024-05-01T09:30:00Z").map(|t| t.0), Some(expected));
        assert_eq!(
            Timestamp::parse("2024-05-01T11:30:00+02:00").map(|t| t.0),
            Some(expected)
        );
        assert!(Timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_deserializes_fractional_seconds() {
        let parsed: Timestamp = serde_json::from_str("\"2024-05-01T09:30:00.123456\"").unwrap();
        assert_eq!(parsed.timestamp(), 1714555800);
    }
}
