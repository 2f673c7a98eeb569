// src/export/tables.rs

use crate::core::crediting::{
    CreditMatrix, Identity, RawScanSummary, SCAN_DISPLAY_FORMAT, ScanHistory,
};
use crate::db::queries::ScanRecord;

/// Mark written in text exports for a credited session.
pub const CHECK_MARK: &str = "✅";

/// Row-major, named-column view shared by every export format.
pub trait Tabular {
    fn headers(&self) -> Vec<String>;
    fn rows(&self) -> Vec<Vec<String>>;
}

fn identity_headers() -> Vec<String> {
    vec!["Badge ID".to_string(), "Name".to_string(), "Email".to_string()]
}

fn identity_cells(id: &Identity) -> Vec<String> {
    vec![id.badge_id.to_string(), id.name.clone(), id.email.clone()]
}

impl Tabular for CreditMatrix {
    fn headers(&self) -> Vec<String> {
        let mut h = identity_headers();
        h.extend(self.columns.iter().cloned());
        h
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                let mut cells = identity_cells(&r.identity);
                cells.extend(r.marks.iter().map(|m| {
                    if m.attended {
                        CHECK_MARK.to_string()
                    } else {
                        String::new()
                    }
                }));
                cells
            })
            .collect()
    }
}

impl Tabular for ScanHistory {
    fn headers(&self) -> Vec<String> {
        let mut h = identity_headers();
        h.extend((1..=self.max_slots).map(|i| format!("Scan {i}")));
        h
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                let mut cells = identity_cells(&r.identity);
                cells.extend((0..self.max_slots).map(|i| {
                    r.scans
                        .get(i)
                        .map(|t| t.format(SCAN_DISPLAY_FORMAT).to_string())
                        .unwrap_or_default()
                }));
                cells
            })
            .collect()
    }
}

impl Tabular for RawScanSummary {
    fn headers(&self) -> Vec<String> {
        let mut h = identity_headers();
        h.push("All Scans".to_string());
        h
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                let mut cells = identity_cells(&r.identity);
                cells.push(r.all_scans.clone());
                cells
            })
            .collect()
    }
}

/// The scan log exactly as stored, for auditing.
pub struct RawScanLog<'a>(pub &'a [ScanRecord]);

impl Tabular for RawScanLog<'_> {
    fn headers(&self) -> Vec<String> {
        ["id", "badge_id", "name", "email", "timestamp", "source"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.badge_id.to_string(),
                    s.name.clone().unwrap_or_default(),
                    s.email.clone().unwrap_or_default(),
                    s.timestamp.clone(),
                    s.source.clone(),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crediting::{build_credit_matrix, build_scan_history};
    use crate::models::attendee::Attendee;
    use crate::models::scan::ScanEvent;
    use crate::models::session::{Schedule, Session};

    fn schedule() -> Schedule {
        Schedule::new(vec![
            Session::parse("A", "2025-05-02 08:30", "2025-05-02 10:00").unwrap(),
            Session::parse("B", "2025-05-02 10:30", "2025-05-02 12:00").unwrap(),
        ])
    }

    #[test]
    fn credit_matrix_columns_follow_schedule() {
        let people = vec![Attendee::new(5, "Alice", "a@example.org")];
        let scans = vec![ScanEvent::new(5_i64, "2025-05-02 09:00")];
        let m = build_credit_matrix(&people, &scans, &schedule());

        assert_eq!(m.headers(), vec!["Badge ID", "Name", "Email", "A", "B"]);
        assert_eq!(
            m.rows(),
            vec![vec!["5", "Alice", "a@example.org", CHECK_MARK, ""]]
        );
    }

    #[test]
    fn history_pads_empty_slots() {
        let scans = vec![ScanEvent::new(9_i64, "2025-05-02 09:00:05")];
        let h = build_scan_history(&[], &scans, 3);

        assert_eq!(h.headers().len(), 6);
        assert_eq!(
            h.rows()[0],
            vec!["9", "<unregistered 9>", "", "2025-05-02 09:00:05", "", ""]
        );
    }
}
