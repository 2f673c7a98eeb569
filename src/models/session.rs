use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of session boundaries in the schedule (local wall-clock time).
pub const SESSION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Session as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpec {
    pub title: String,
    pub start: String,
    pub end: String,
}

impl SessionSpec {
    pub fn new(title: &str, start: &str, end: &str) -> Self {
        Self {
            title: title.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// A CE-eligible session window. Both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Session {
    /// Parse a session from `YYYY-MM-DD HH:MM` boundaries.
    pub fn parse(title: &str, start: &str, end: &str) -> AppResult<Self> {
        let start_dt = parse_session_time(start)?;
        let end_dt = parse_session_time(end)?;

        if start_dt >= end_dt {
            return Err(AppError::InvalidSession(format!(
                "'{title}' starts at {start} but ends at {end}"
            )));
        }

        Ok(Self {
            title: title.to_string(),
            start: start_dt,
            end: end_dt,
        })
    }

    /// Closed interval: a scan exactly on either boundary counts.
    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

fn parse_session_time(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), SESSION_TIME_FORMAT)
        .map_err(|_| AppError::InvalidSession(format!("'{s}' is not in YYYY-MM-DD HH:MM format")))
}

/// Ordered list of sessions. Column order in every report follows the
/// order sessions were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub sessions: Vec<Session>,
}

impl Schedule {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    pub fn from_specs(specs: &[SessionSpec]) -> AppResult<Self> {
        let sessions = specs
            .iter()
            .map(|s| Session::parse(&s.title, &s.start, &s.end))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self { sessions })
    }

    /// Sessions starting on `day`, in schedule order.
    pub fn for_day(&self, day: NaiveDate) -> Schedule {
        Schedule {
            sessions: self
                .sessions
                .iter()
                .filter(|s| s.day() == day)
                .cloned()
                .collect(),
        }
    }

    /// Distinct conference days, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self.sessions.iter().map(Session::day).collect();
        days.sort();
        days.dedup();
        days
    }

    pub fn titles(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.title.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Built-in three-day conference schedule, used when the configuration
    /// file does not define one.
    pub fn default_conference() -> Vec<SessionSpec> {
        vec![
            SessionSpec::new("Prevention of C.M.", "2025-05-02 08:30", "2025-05-02 10:00"),
            SessionSpec::new(
                "The TDCJ SO Treatment Program",
                "2025-05-02 10:30",
                "2025-05-02 12:00",
            ),
            SessionSpec::new(
                "Taking the High Road - Ethical Challenges (Part 1)",
                "2025-05-02 13:30",
                "2025-05-02 15:00",
            ),
            SessionSpec::new(
                "Taking the High Road - Ethical Challenges (Part 2)",
                "2025-05-02 15:30",
                "2025-05-02 17:00",
            ),
            SessionSpec::new(
                "Use of Polygraph Exams in Treatment",
                "2025-05-03 08:30",
                "2025-05-03 10:00",
            ),
            SessionSpec::new(
                "Challenges, Lessons Learned...",
                "2025-05-03 10:30",
                "2025-05-03 12:00",
            ),
            SessionSpec::new(
                "Treating Clients with Mild Autism",
                "2025-05-03 13:30",
                "2025-05-03 15:00",
            ),
            SessionSpec::new(
                "Unpacking the Offense Cycle",
                "2025-05-03 15:30",
                "2025-05-03 17:00",
            ),
            SessionSpec::new("Risk Assessment Reports", "2025-05-04 08:30", "2025-05-04 10:00"),
            SessionSpec::new("Chaperon Training", "2025-05-04 10:30", "2025-05-04 12:00"),
            SessionSpec::new(
                "Legal and Strategy Aspects of Deregistration",
                "2025-05-04 13:30",
                "2025-05-04 15:00",
            ),
            SessionSpec::new(
                "RNR Approach to Adolescent Assessment",
                "2025-05-04 15:30",
                "2025-05-04 17:00",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_inverted_window() {
        let err = Session::parse("A", "2025-05-02 10:00", "2025-05-02 08:30").unwrap_err();
        assert!(matches!(err, AppError::InvalidSession(_)));
    }

    #[test]
    fn parse_rejects_bad_format() {
        assert!(Session::parse("A", "2025/05/02 08:30", "2025-05-02 10:00").is_err());
    }

    #[test]
    fn default_schedule_spans_three_days() {
        let schedule = Schedule::from_specs(&Schedule::default_conference()).unwrap();
        assert_eq!(schedule.sessions.len(), 12);
        assert_eq!(schedule.days().len(), 3);

        let day = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let titles = schedule.for_day(day).titles();
        assert_eq!(titles.len(), 4);
        assert_eq!(titles[0], "Use of Polygraph Exams in Treatment");
        assert_eq!(titles[3], "Unpacking the Offense Cycle");
    }
}
