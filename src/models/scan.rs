use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Badge id as delivered by an upstream store: either already numeric or
/// the decoded code string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBadgeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RawBadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawBadgeId::Int(n) => write!(f, "{n}"),
            RawBadgeId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RawBadgeId {
    fn from(n: i64) -> Self {
        RawBadgeId::Int(n)
    }
}

impl From<&str> for RawBadgeId {
    fn from(s: &str) -> Self {
        RawBadgeId::Text(s.to_string())
    }
}

/// Scan instant in any of the representations found in the scan log:
/// a native value, an ISO-8601 string or the legacy
/// `datetime.datetime(...)` wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Instant(NaiveDateTime),
    Text(String),
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTimestamp::Instant(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            RawTimestamp::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<NaiveDateTime> for RawTimestamp {
    fn from(dt: NaiveDateTime) -> Self {
        RawTimestamp::Instant(dt)
    }
}

impl From<&str> for RawTimestamp {
    fn from(s: &str) -> Self {
        RawTimestamp::Text(s.to_string())
    }
}

/// One entry of the append-only scan log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub badge_id: RawBadgeId,
    pub timestamp: RawTimestamp,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ScanEvent {
    pub fn new(badge_id: impl Into<RawBadgeId>, timestamp: impl Into<RawTimestamp>) -> Self {
        Self {
            badge_id: badge_id.into(),
            timestamp: timestamp.into(),
            name: None,
            email: None,
        }
    }
}
