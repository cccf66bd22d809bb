// ── UTC offsets and timestamp resolution ──
//
// The NVR reports time zones as `GMT±H[:MM]` strings and expects epoch
// milliseconds in its query parameters. Camera-reported offsets feed a
// unanimity consensus when the server itself omits one.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::CoreError;

/// Minute granularity, matching the NVR web UI.
pub const DEFAULT_RESOLUTION_MS: i64 = 60_000;

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static GMT_OFFSET: Pattern =
    LazyLock::new(|| Regex::new(r"(?i)^gmt([+-])([0-9]{1,2})(?::([0-9]{1,2}))?"));

static LOOSE_ISO8601: Pattern = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})-*([0-9]{2})-*([0-9]{2})[Tt\s]*",
        r"(?:([0-9]{2}):*)?",
        r"(?:([0-9]{2}):*)?",
        r"(?:([0-9]{2}):*)?",
    ))
});

fn compiled(pattern: &'static Pattern) -> Result<&'static Regex, CoreError> {
    pattern
        .as_ref()
        .map_err(|e| CoreError::Internal(format!("invalid pattern: {e}")))
}

/// Parse `GMT+5`, `GMT-05:42`, `gmt+0:04` and friends into signed seconds.
pub fn parse_gmt_offset(text: &str) -> Result<i32, CoreError> {
    let caps = compiled(&GMT_OFFSET)?
        .captures(text)
        .ok_or_else(|| CoreError::format(text, "not a GMT offset"))?;

    let sign = if &caps[1] == "-" { -1 } else { 1 };
    let hours: i32 = caps[2]
        .parse()
        .map_err(|_| CoreError::format(text, "bad hours"))?;
    let minutes: i32 = match caps.get(3) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| CoreError::format(text, "bad minutes"))?,
        None => 0,
    };

    Ok(sign * (hours * 3600 + minutes * 60))
}

/// Anything that can be pinned to an instant.
#[derive(Debug, Clone, PartialEq)]
pub enum DateTimeInput {
    /// Unix timestamp in seconds. Already absolute; offsets are ignored.
    Epoch(i64),
    /// Carries its own offset, which takes precedence.
    Aware(DateTime<FixedOffset>),
    /// Wall-clock time, shifted by the caller's offset.
    Naive(NaiveDateTime),
    /// `YYYY[-]MM[-]DD[T ][HH[:]][MM[:]][SS]`, treated as naive.
    Text(String),
}

impl From<i64> for DateTimeInput {
    fn from(secs: i64) -> Self {
        Self::Epoch(secs)
    }
}

impl From<DateTime<FixedOffset>> for DateTimeInput {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Aware(dt)
    }
}

impl From<NaiveDateTime> for DateTimeInput {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Naive(dt)
    }
}

impl From<&str> for DateTimeInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for DateTimeInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Resolve `input` to epoch milliseconds.
///
/// The wall-clock value is floored to `resolution_ms`, then shifted by the
/// applicable offset (`offset_secs` for naive input, the embedded offset for
/// aware input, none for epoch input).
pub fn resolve_to_epoch_millis(
    input: impl Into<DateTimeInput>,
    offset_secs: i32,
    resolution_ms: i64,
) -> Result<i64, CoreError> {
    let input = input.into();
    let out_of_range =
        || CoreError::format(format!("{input:?}"), "outside the representable range");
    let (wall_ms, offset_secs) = match &input {
        DateTimeInput::Epoch(secs) => (secs.checked_mul(1000).ok_or_else(out_of_range)?, 0),
        DateTimeInput::Aware(dt) => (
            dt.naive_local().and_utc().timestamp_millis(),
            dt.offset().local_minus_utc(),
        ),
        DateTimeInput::Naive(dt) => (dt.and_utc().timestamp_millis(), offset_secs),
        DateTimeInput::Text(s) => (
            parse_loose_datetime(s)?.and_utc().timestamp_millis(),
            offset_secs,
        ),
    };

    let resolution = resolution_ms.max(1);
    wall_ms
        .checked_sub(wall_ms.rem_euclid(resolution))
        .and_then(|floored| floored.checked_sub(i64::from(offset_secs) * 1000))
        .ok_or_else(out_of_range)
}

fn parse_loose_datetime(text: &str) -> Result<NaiveDateTime, CoreError> {
    let caps = compiled(&LOOSE_ISO8601)?
        .captures(text)
        .ok_or_else(|| CoreError::format(text, "expected at least YYYY-MM-DD"))?;

    let field = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let year: i32 = caps[1]
        .parse()
        .map_err(|_| CoreError::format(text, "bad year"))?;

    let date = NaiveDate::from_ymd_opt(year, field(2), field(3))
        .ok_or_else(|| CoreError::format(text, "no such date"))?;
    let time = NaiveTime::from_hms_opt(field(4), field(5), field(6))
        .ok_or_else(|| CoreError::format(text, "no such time"))?;

    Ok(NaiveDateTime::new(date, time))
}

/// Adopt an offset only when every reporting camera agrees.
///
/// `None` entries (cameras without a parseable zone) are skipped. Returns
/// `None` when nothing was reported or reports disagree.
pub fn consensus_offset<I>(offsets: I) -> Option<i32>
where
    I: IntoIterator<Item = Option<i32>>,
{
    let mut reported = offsets.into_iter().flatten();
    let first = reported.next()?;
    reported.all(|o| o == first).then_some(first)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn gmt_offsets() {
        let cases = [
            ("GMT+5", 5 * 3600),
            ("GMT-5", -5 * 3600),
            ("GMT-05", -5 * 3600),
            ("GMT+05:04", 5 * 3600 + 4 * 60),
            ("GMT+5:4", 5 * 3600 + 4 * 60),
            ("GMT+05:42", 5 * 3600 + 42 * 60),
            ("GMT-05:42", -20520),
            ("GMT-5:4", -5 * 3600 - 4 * 60),
            ("GMT-00:04", -4 * 60),
            ("GMT-0:04", -4 * 60),
            ("GMT+0:04", 240),
            ("gmt+2", 7200),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_gmt_offset(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn gmt_offset_rejects_garbage() {
        for input in ["not-a-gmt", "UTC+5", "GMT", "GMT5", ""] {
            let err = parse_gmt_offset(input).unwrap_err();
            assert!(matches!(err, CoreError::Format { .. }), "{input}");
        }
    }

    #[test]
    fn resolves_loose_strings() {
        let cases = [
            ("1970-01-01T00:00", 0, 0),
            ("1970-01-01T01:00", 0, 3_600_000),
            ("1970-01-01T01:00", 3600, 0),
            ("1970-01-01T01:00", 7200, -3_600_000),
            ("2020-03-03T23:11:22", 0, 1_583_277_060_000),
            ("2020-03-03T23:11:21", 0, 1_583_277_060_000),
            ("2020-03-03 23:11", 0, 1_583_277_060_000),
            ("20200303T2311", 0, 1_583_277_060_000),
            ("2020030323:11", 0, 1_583_277_060_000),
            ("202003032311Z", 0, 1_583_277_060_000),
            ("202003032311+03:00", 0, 1_583_277_060_000),
            ("2020-03-03T23:10:2124", 0, 1_583_277_000_000),
            ("2020-03-03T2310blah", 0, 1_583_277_000_000),
            ("2020-03-03230blah", 0, 1_583_276_400_000),
            ("2019-10-02T23:11:00", 0, 1_570_057_860_000),
        ];
        for (input, offset, expected) in cases {
            assert_eq!(
                resolve_to_epoch_millis(input, offset, DEFAULT_RESOLUTION_MS).unwrap(),
                expected,
                "{input} @ {offset}"
            );
        }
    }

    #[test]
    fn second_resolution_keeps_seconds() {
        assert_eq!(
            resolve_to_epoch_millis("2020-03-03T23:11:22", 0, 1000).unwrap(),
            1_583_277_082_000
        );
    }

    #[test]
    fn rejects_unparseable_strings() {
        for input in [
            "2020-aa-032310blah",
            "2020-00-032310blah",
            "a2020-00-032310blah",
            "a020-03-002310blah",
        ] {
            let err = resolve_to_epoch_millis(input, 0, DEFAULT_RESOLUTION_MS).unwrap_err();
            assert!(matches!(err, CoreError::Format { .. }), "{input}");
        }
    }

    #[test]
    fn epoch_input_ignores_offset() {
        assert_eq!(resolve_to_epoch_millis(0_i64, 0, DEFAULT_RESOLUTION_MS).unwrap(), 0);
        assert_eq!(resolve_to_epoch_millis(0_i64, 7200, DEFAULT_RESOLUTION_MS).unwrap(), 0);
    }

    #[test]
    fn epoch_input_out_of_range_is_a_format_error() {
        for secs in [99_999_999_999_999_999_i64, i64::MAX, i64::MIN] {
            let err = resolve_to_epoch_millis(secs, 0, DEFAULT_RESOLUTION_MS).unwrap_err();
            assert!(matches!(err, CoreError::Format { .. }), "{secs}");
        }
    }

    #[test]
    fn aware_input_uses_its_own_offset() {
        let helsinki_winter = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = helsinki_winter
            .with_ymd_and_hms(1970, 1, 1, 1, 0, 0)
            .unwrap();
        assert_eq!(
            resolve_to_epoch_millis(dt, 829_869_263, DEFAULT_RESOLUTION_MS).unwrap(),
            -3_600_000
        );

        let helsinki_summer = FixedOffset::east_opt(3 * 3600).unwrap();
        let dt = helsinki_summer
            .with_ymd_and_hms(2017, 10, 2, 23, 11, 0)
            .unwrap();
        assert_eq!(
            resolve_to_epoch_millis(dt, 0, DEFAULT_RESOLUTION_MS).unwrap(),
            1_506_975_060_000
        );
    }

    #[test]
    fn naive_input_uses_caller_offset() {
        let dt = NaiveDate::from_ymd_opt(2019, 10, 2)
            .unwrap()
            .and_hms_opt(23, 11, 0)
            .unwrap();
        assert_eq!(
            resolve_to_epoch_millis(dt, 0, DEFAULT_RESOLUTION_MS).unwrap(),
            1_570_057_860_000
        );
    }

    #[test]
    fn consensus_requires_unanimity() {
        assert_eq!(
            consensus_offset([Some(3600), Some(7200), Some(10800)]),
            None
        );
        assert_eq!(
            consensus_offset([Some(18000), Some(18000), Some(18000)]),
            Some(18000)
        );
        assert_eq!(consensus_offset([None, Some(3600), None]), Some(3600));
        assert_eq!(consensus_offset([None, None]), None);
        assert_eq!(consensus_offset(std::iter::empty()), None);
    }
}
