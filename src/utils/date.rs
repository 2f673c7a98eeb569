use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local wall-clock time at second precision.
pub fn now_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Pick the report day: the requested one, else today when it falls inside
/// the conference, else the first conference day.
pub fn default_report_day(requested: Option<NaiveDate>, days: &[NaiveDate]) -> Option<NaiveDate> {
    if requested.is_some() {
        return requested;
    }

    let today = today();
    if days.contains(&today) {
        return Some(today);
    }
    days.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_day_wins() {
        let d = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        assert_eq!(default_report_day(Some(d), &[]), Some(d));
    }

    #[test]
    fn falls_back_to_first_day() {
        let days = [
            NaiveDate::from_ymd_opt(1999, 5, 2).unwrap(),
            NaiveDate::from_ymd_opt(1999, 5, 3).unwrap(),
        ];
        assert_eq!(default_report_day(None, &days), Some(days[0]));
        assert_eq!(default_report_day(None, &[]), None);
    }

    #[test]
    fn parse_date_reports_input() {
        assert!(matches!(parse_date("05/02/2025"), Err(AppError::InvalidDate(s)) if s == "05/02/2025"));
    }
}
