// src/export/excel_date.rs

use chrono::{NaiveDate, NaiveDateTime};

/// Formati riconosciuti come data/ora, con il formato numerico Excel da usare.
const DATETIME_FORMATS: [(&str, &str); 4] = [
    ("%Y-%m-%d %H:%M:%S", "yyyy-mm-dd hh:mm:ss"),
    ("%Y-%m-%dT%H:%M:%S", "yyyy-mm-dd hh:mm:ss"),
    ("%Y-%m-%d %H:%M", "yyyy-mm-dd hh:mm"),
    ("%Y-%m-%dT%H:%M", "yyyy-mm-dd hh:mm"),
];

/// Prova a interpretare una stringa come data/ora o solo data,
/// restituendo il formato numerico + il *seriale Excel*.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    for (fmt, num_format) in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some((num_format, naive_datetime_to_excel_serial(&dt)?));
        }
    }

    let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let serial = naive_datetime_to_excel_serial(&d.and_hms_opt(0, 0, 0)?)?;
    Some(("yyyy-mm-dd", serial))
}

fn naive_datetime_to_excel_serial(dt: &NaiveDateTime) -> Option<f64> {
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;

    let duration = *dt - excel_epoch;

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    Some(days + secs / 86400.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_timestamp_keeps_seconds() {
        let (fmt, serial) = parse_to_excel_date("2025-05-02 09:00:30").unwrap();
        assert_eq!(fmt, "yyyy-mm-dd hh:mm:ss");
        // 2025-05-02 is serial 45779
        assert!((serial - (45779.0 + 32430.0 / 86400.0)).abs() < 1e-9);
    }

    #[test]
    fn plain_text_is_not_a_date() {
        assert!(parse_to_excel_date("Alice").is_none());
        assert!(parse_to_excel_date("42").is_none());
    }
}
