//! Millisecond-precision UTC timestamps.
//!
//! Persisted as `YYYY-MM-DDTHH:MM:SS.mmmZ`, the same text a browser produces
//! with `Date.prototype.toISOString()`. Years outside `0000..=9999` use the
//! expanded form `±YYYYYY-MM-DD…` that browsers emit for them. Any RFC 3339
//! input is accepted on read, with or without an expanded year.

use chrono::{DateTime, Datelike, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// UTC instant truncated to whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wraps a chrono value, dropping sub-millisecond precision.
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value.trunc_subsecs(3))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Parses one RFC 3339 string, normalizing the offset to UTC.
    ///
    /// A signed year of five or more digits (`+010000`, `+10000`, `-000001`)
    /// is accepted as well.
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        let value = value.trim();
        if let Some(parsed) = parse_expanded_year(value) {
            return parsed;
        }
        DateTime::parse_from_rfc3339(value)
            .map(|parsed| Self::from_datetime(parsed.with_timezone(&Utc)))
    }
}

/// Splits `±Y…Y-rest` into the signed year and `-rest`.
fn split_expanded_year(value: &str) -> Option<(i32, &str)> {
    let negative = match value.as_bytes().first()? {
        b'+' => false,
        b'-' => true,
        _ => return None,
    };
    let digits_end = value[1..]
        .find(|ch: char| !ch.is_ascii_digit())
        .map(|index| index + 1)?;
    if digits_end < 6 {
        return None;
    }
    let magnitude: i32 = value[1..digits_end].parse().ok()?;
    let year = if negative { -magnitude } else { magnitude };
    Some((year, &value[digits_end..]))
}

/// Parses an expanded-year timestamp.
///
/// The date part is validated against a stand-in year in `2000..2400` with
/// the same position in the 400-year Gregorian cycle, then moved to the real
/// year. `None` means the input has no expanded year at all.
fn parse_expanded_year(value: &str) -> Option<Result<Timestamp, chrono::ParseError>> {
    let (year, rest) = split_expanded_year(value)?;
    let stand_in = 2000 + year.rem_euclid(400);
    let parsed = match DateTime::parse_from_rfc3339(&format!("{stand_in:04}{rest}")) {
        Ok(parsed) => parsed,
        Err(err) => return Some(Err(err)),
    };
    let offset = Duration::seconds(i64::from(parsed.offset().local_minus_utc()));
    let utc = parsed
        .naive_local()
        .with_year(year)
        .and_then(|local| local.checked_sub_signed(offset));
    match utc {
        Some(utc) => Some(Ok(Timestamp::from_datetime(utc.and_utc()))),
        // Outside chrono's range; report it the way a malformed string would.
        None => Some(DateTime::parse_from_rfc3339(value).map(|parsed| {
            Timestamp::from_datetime(parsed.with_timezone(&Utc))
        })),
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let year = self.0.year();
        if (0..=9999).contains(&year) {
            return f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        let sign = if year < 0 { '-' } else { '+' };
        write!(
            f,
            "{sign}{:06}-{}",
            year.unsigned_abs(),
            self.0.format("%m-%dT%H:%M:%S%.3fZ")
        )
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|err| {
            serde::de::Error::custom(format!("invalid ISO-8601 timestamp `{raw}`: {err}"))
        })
    }
}
