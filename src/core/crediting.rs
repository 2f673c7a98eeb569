//! Attendance crediting: turns the raw scan log into the CE credit matrix,
//! the slotted per-badge scan history and the one-line scan summary.
//!
//! All functions here are pure. Malformed scans are collected in the
//! `skipped` list of each result and never abort the batch.

use crate::core::normalize::{normalize_badge_id, normalize_timestamp};
use crate::errors::{AppError, AppResult};
use crate::models::attendee::Attendee;
use crate::models::scan::ScanEvent;
use crate::models::session::Schedule;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rendering of scan instants in history and summary rows.
pub const SCAN_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of timestamp columns in the scan history.
pub const DEFAULT_MAX_SLOTS: usize = 10;

/// Normalized scan instants grouped by badge key.
#[derive(Debug, Default)]
pub struct ScanGroups {
    /// Badge key → instants, ascending.
    pub by_badge: BTreeMap<i64, Vec<NaiveDateTime>>,
    /// One `AppError::MalformedRecord` per scan that could not be normalized.
    pub skipped: Vec<AppError>,
}

impl ScanGroups {
    pub fn instants(&self, badge_id: i64) -> &[NaiveDateTime] {
        self.by_badge.get(&badge_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn normalize_scan(index: usize, scan: &ScanEvent) -> AppResult<(i64, NaiveDateTime)> {
    let malformed = |e: AppError| AppError::MalformedRecord {
        index,
        reason: e.to_string(),
    };

    let badge = normalize_badge_id(&scan.badge_id).map_err(malformed)?;
    let at = normalize_timestamp(&scan.timestamp).map_err(malformed)?;
    Ok((badge, at))
}

/// Normalize every scan and group the instants per badge, oldest first.
pub fn group_scans(scans: &[ScanEvent]) -> ScanGroups {
    let mut groups = ScanGroups::default();

    for (index, scan) in scans.iter().enumerate() {
        match normalize_scan(index, scan) {
            Ok((badge, at)) => groups.by_badge.entry(badge).or_default().push(at),
            Err(e) => groups.skipped.push(e),
        }
    }

    for instants in groups.by_badge.values_mut() {
        instants.sort();
    }

    groups
}

/// Registry lookup by badge key. On duplicate ids the first record wins.
fn index_registry(attendees: &[Attendee]) -> BTreeMap<i64, &Attendee> {
    let mut registry = BTreeMap::new();
    for a in attendees {
        registry.entry(a.badge_id).or_insert(a);
    }
    registry
}

/// Placeholder name for a badge seen in scans but not in the registry.
pub fn unregistered_label(badge_id: i64) -> String {
    format!("<unregistered {badge_id}>")
}

/// Identity columns shared by every report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub badge_id: i64,
    pub name: String,
    pub email: String,
    pub registered: bool,
}

impl Identity {
    fn resolve(registry: &BTreeMap<i64, &Attendee>, badge_id: i64) -> Self {
        match registry.get(&badge_id) {
            Some(a) => Self {
                badge_id,
                name: a.name.clone(),
                email: a.email.clone(),
                registered: true,
            },
            None => Self {
                badge_id,
                name: unregistered_label(badge_id),
                email: String::new(),
                registered: false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Credit matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMark {
    pub title: String,
    pub attended: bool,
}

/// One row of the credit matrix. `marks` holds every session of the
/// report, in column order, even when not attended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditRow {
    pub identity: Identity,
    pub marks: Vec<SessionMark>,
}

impl CreditRow {
    pub fn badge_id(&self) -> i64 {
        self.identity.badge_id
    }

    pub fn attended(&self, title: &str) -> Option<bool> {
        self.marks
            .iter()
            .find(|m| m.title == title)
            .map(|m| m.attended)
    }

    pub fn credited_sessions(&self) -> usize {
        self.marks.iter().filter(|m| m.attended).count()
    }
}

#[derive(Debug, Default)]
pub struct CreditMatrix {
    /// Session titles in schedule order.
    pub columns: Vec<String>,
    /// Rows ordered by ascending badge key.
    pub rows: Vec<CreditRow>,
    pub skipped: Vec<AppError>,
}

impl CreditMatrix {
    pub fn row(&self, badge_id: i64) -> Option<&CreditRow> {
        self.rows.iter().find(|r| r.badge_id() == badge_id)
    }

    pub fn unregistered(&self) -> impl Iterator<Item = &CreditRow> {
        self.rows.iter().filter(|r| !r.identity.registered)
    }
}

/// Build the attendee × session credit matrix.
///
/// Rows are the union of the registry and the badges found in the scan
/// log; a badge scanned but never registered gets a placeholder identity.
pub fn build_credit_matrix(
    attendees: &[Attendee],
    scans: &[ScanEvent],
    schedule: &Schedule,
) -> CreditMatrix {
    let registry = index_registry(attendees);
    let groups = group_scans(scans);

    let mut keys: Vec<i64> = registry.keys().copied().collect();
    keys.extend(
        groups
            .by_badge
            .keys()
            .filter(|k| !registry.contains_key(*k))
            .copied(),
    );
    keys.sort_unstable();

    let rows = keys
        .into_iter()
        .map(|badge| {
            let instants = groups.instants(badge);
            let marks = schedule
                .sessions
                .iter()
                .map(|s| SessionMark {
                    title: s.title.clone(),
                    attended: instants.iter().any(|t| s.contains(t)),
                })
                .collect();

            CreditRow {
                identity: Identity::resolve(&registry, badge),
                marks,
            }
        })
        .collect();

    CreditMatrix {
        columns: schedule.titles(),
        rows,
        skipped: groups.skipped,
    }
}

// ---------------------------------------------------------------------------
// Slotted scan history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub identity: Identity,
    /// At most `max_slots` instants, ascending.
    pub scans: Vec<NaiveDateTime>,
    /// Scans beyond the slot cap, not shown.
    pub hidden: usize,
}

#[derive(Debug, Default)]
pub struct ScanHistory {
    pub max_slots: usize,
    pub rows: Vec<HistoryRow>,
    pub skipped: Vec<AppError>,
}

/// One row per badge with at least one valid scan, showing up to
/// `max_slots` timestamps in chronological order.
pub fn build_scan_history(
    attendees: &[Attendee],
    scans: &[ScanEvent],
    max_slots: usize,
) -> ScanHistory {
    let registry = index_registry(attendees);
    let groups = group_scans(scans);

    let rows = groups
        .by_badge
        .iter()
        .map(|(badge, instants)| {
            let shown = instants.len().min(max_slots);
            HistoryRow {
                identity: Identity::resolve(&registry, *badge),
                scans: instants[..shown].to_vec(),
                hidden: instants.len() - shown,
            }
        })
        .collect();

    ScanHistory {
        max_slots,
        rows,
        skipped: groups.skipped,
    }
}

// ---------------------------------------------------------------------------
// Raw scan summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub identity: Identity,
    /// Every scan of the badge, ascending, joined with ", ".
    pub all_scans: String,
    pub scan_count: usize,
}

#[derive(Debug, Default)]
pub struct RawScanSummary {
    pub rows: Vec<SummaryRow>,
    pub skipped: Vec<AppError>,
}

/// One row per registered attendee with all scans on a single line.
pub fn build_raw_scan_summary(attendees: &[Attendee], scans: &[ScanEvent]) -> RawScanSummary {
    let registry = index_registry(attendees);
    let groups = group_scans(scans);

    let rows = registry
        .keys()
        .map(|badge| {
            let instants = groups.instants(*badge);
            SummaryRow {
                identity: Identity::resolve(&registry, *badge),
                all_scans: instants
                    .iter()
                    .map(|t| t.format(SCAN_DISPLAY_FORMAT).to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                scan_count: instants.len(),
            }
        })
        .collect();

    RawScanSummary {
        rows,
        skipped: groups.skipped,
    }
}
