//! Normalization of raw scan fields at the ingestion boundary.
//!
//! Everything downstream works on `i64` badge keys and `NaiveDateTime`
//! instants truncated to whole seconds; no other code looks at how a value
//! was serialized.

use crate::errors::{AppError, AppResult};
use crate::models::scan::{RawBadgeId, RawTimestamp};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use std::sync::OnceLock;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

fn legacy_wrapper() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^datetime\.datetime\((?P<inner>.*)\)$").expect("valid legacy wrapper regex")
    })
}

/// Canonical badge key. Only positive integers are valid badge ids.
pub fn normalize_badge_id(raw: &RawBadgeId) -> AppResult<i64> {
    let id = match raw {
        RawBadgeId::Int(n) => *n,
        RawBadgeId::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::InvalidBadgeId(s.clone()))?,
    };

    if id < 1 {
        return Err(AppError::InvalidBadgeId(raw.to_string()));
    }

    Ok(id)
}

/// Canonical scan instant at second precision.
///
/// Accepts native values, ISO-8601 strings (with or without offset; an
/// offset is dropped and the wall-clock time kept) and the legacy
/// `datetime.datetime(...)` wrapper holding either an ISO string or
/// comma-separated components.
pub fn normalize_timestamp(raw: &RawTimestamp) -> AppResult<NaiveDateTime> {
    let dt = match raw {
        RawTimestamp::Instant(dt) => *dt,
        RawTimestamp::Text(s) => parse_text_timestamp(s.trim())
            .ok_or_else(|| AppError::InvalidTimestamp(s.clone()))?,
    };

    Ok(truncate_to_seconds(dt))
}

fn parse_text_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Some(caps) = legacy_wrapper().captures(s) {
        let inner = caps.name("inner")?.as_str().trim();
        let inner = inner.trim_matches(|c| c == '\'' || c == '"');
        return if inner.contains(',') {
            parse_components(inner)
        } else {
            parse_iso(inner)
        };
    }

    parse_iso(s)
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `2025, 5, 2, 9, 0, 12[, micro][, tzinfo=...]`
fn parse_components(s: &str) -> Option<NaiveDateTime> {
    let parts: Vec<u32> = s
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.contains('='))
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    if parts.len() < 3 || parts.len() > 7 {
        return None;
    }

    let at = |i: usize| parts.get(i).copied().unwrap_or(0);

    let date = NaiveDate::from_ymd_opt(i32::try_from(parts[0]).ok()?, parts[1], parts[2])?;
    let time = NaiveTime::from_hms_micro_opt(at(3), at(4), at(5), at(6))?;
    Some(date.and_time(time))
}

fn truncate_to_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn badge_id_from_int_and_text() {
        assert_eq!(normalize_badge_id(&RawBadgeId::Int(7)).unwrap(), 7);
        assert_eq!(normalize_badge_id(&RawBadgeId::from(" 42 ")).unwrap(), 42);
    }

    #[test]
    fn badge_id_rejects_garbage() {
        assert!(matches!(
            normalize_badge_id(&RawBadgeId::from("abc")),
            Err(AppError::InvalidBadgeId(_))
        ));
        assert!(normalize_badge_id(&RawBadgeId::from("")).is_err());
        assert!(normalize_badge_id(&RawBadgeId::Int(0)).is_err());
        assert!(normalize_badge_id(&RawBadgeId::Int(-3)).is_err());
    }

    #[test]
    fn iso_forms_agree() {
        let expected = ts("2025-05-02 09:00:12");
        for raw in [
            "2025-05-02T09:00:12",
            "2025-05-02 09:00:12",
            "2025-05-02T09:00:12.734211",
            "2025-05-02T09:00:12+00:00",
            "2025-05-02 09:00:12.5-05:00",
            "2025-05-02T09:00:12Z",
        ] {
            assert_eq!(
                normalize_timestamp(&RawTimestamp::from(raw)).unwrap(),
                expected,
                "{raw}"
            );
        }
    }

    #[test]
    fn offset_without_colon_or_seconds() {
        for (raw, expected) in [
            ("2025-05-02T09:00+00:00", "2025-05-02 09:00:00"),
            ("2025-05-02T09:00:00+0200", "2025-05-02 09:00:00"),
            ("2025-05-02T09:00:12.25+0200", "2025-05-02 09:00:12"),
            ("2025-05-02 09:00-05:00", "2025-05-02 09:00:00"),
            ("2025-05-02T09:00-0500", "2025-05-02 09:00:00"),
        ] {
            assert_eq!(
                normalize_timestamp(&RawTimestamp::from(raw)).unwrap(),
                ts(expected),
                "{raw}"
            );
        }
    }

    #[test]
    fn minute_precision_and_date_only() {
        assert_eq!(
            normalize_timestamp(&RawTimestamp::from("2025-05-02 09:00")).unwrap(),
            ts("2025-05-02 09:00:00")
        );
        assert_eq!(
            normalize_timestamp(&RawTimestamp::from("2025-05-02")).unwrap(),
            ts("2025-05-02 00:00:00")
        );
    }

    #[test]
    fn legacy_wrapper_with_iso_inner() {
        let raw = RawTimestamp::from("datetime.datetime(2025-05-02 09:15:00)");
        assert_eq!(normalize_timestamp(&raw).unwrap(), ts("2025-05-02 09:15:00"));
    }

    #[test]
    fn legacy_wrapper_with_components() {
        let raw = RawTimestamp::from("datetime.datetime(2025, 5, 2, 9, 15, 30, 120000)");
        assert_eq!(normalize_timestamp(&raw).unwrap(), ts("2025-05-02 09:15:30"));

        let raw = RawTimestamp::from(
            "datetime.datetime(2025, 5, 2, 9, 15, tzinfo=datetime.timezone.utc)",
        );
        assert_eq!(normalize_timestamp(&raw).unwrap(), ts("2025-05-02 09:15:00"));
    }

    #[test]
    fn native_instant_is_truncated() {
        let dt = NaiveDate::from_ymd_opt(2025, 5, 2)
            .unwrap()
            .and_hms_milli_opt(9, 0, 1, 999)
            .unwrap();
        assert_eq!(
            normalize_timestamp(&RawTimestamp::Instant(dt)).unwrap(),
            ts("2025-05-02 09:00:01")
        );
    }

    #[test]
    fn unparseable_timestamp_is_rejected() {
        for raw in ["yesterday", "datetime.datetime(nope)", "2025-13-40 10:00"] {
            assert!(matches!(
                normalize_timestamp(&RawTimestamp::from(raw)),
                Err(AppError::InvalidTimestamp(_))
            ));
        }
    }
}
