//! Library-level checks of the crediting and layout engines.

use chrono::NaiveDateTime;
use rcheckin::core::crediting::{build_credit_matrix, build_raw_scan_summary, build_scan_history};
use rcheckin::core::layout::{BadgeGeometry, layout_badges};
use rcheckin::errors::AppError;
use rcheckin::models::attendee::Attendee;
use rcheckin::models::scan::ScanEvent;
use rcheckin::models::session::{Schedule, Session};

fn schedule() -> Schedule {
    Schedule::new(vec![
        Session::parse("Morning", "2025-05-02 08:30", "2025-05-02 10:00").unwrap(),
        Session::parse("Late morning", "2025-05-02 10:30", "2025-05-02 12:00").unwrap(),
        Session::parse("Next day", "2025-05-03 08:30", "2025-05-03 10:00").unwrap(),
    ])
}

#[test]
fn mixed_scan_representations_credit_the_same_badge() {
    let attendees = vec![Attendee::new(3, "Dana", "dana@example.org")];
    let at = NaiveDateTime::parse_from_str("2025-05-03 08:30", "%Y-%m-%d %H:%M").unwrap();
    let scans = vec![
        ScanEvent::new(3_i64, "2025-05-02T10:00:00"),
        ScanEvent::new(" 3 ", "datetime.datetime(2025, 5, 2, 11, 59, 59)"),
        ScanEvent::new("3", at),
    ];

    let m = build_credit_matrix(&attendees, &scans, &schedule());
    let row = m.row(3).unwrap();
    assert_eq!(row.credited_sessions(), 3);
    assert!(m.skipped.is_empty());
}

#[test]
fn scans_between_sessions_earn_nothing() {
    let attendees = vec![Attendee::new(1, "Eve", "eve@example.org")];
    let scans = vec![ScanEvent::new(1_i64, "2025-05-02 10:15")];

    let m = build_credit_matrix(&attendees, &scans, &schedule());
    assert_eq!(m.row(1).unwrap().credited_sessions(), 0);
}

#[test]
fn malformed_records_are_reported_by_every_view() {
    let attendees = vec![Attendee::new(1, "Eve", "eve@example.org")];
    let scans = vec![
        ScanEvent::new(1_i64, "2025-05-02 09:00"),
        ScanEvent::new("x", "2025-05-02 09:00"),
    ];

    let m = build_credit_matrix(&attendees, &scans, &schedule());
    let h = build_scan_history(&attendees, &scans, 10);
    let s = build_raw_scan_summary(&attendees, &scans);

    for skipped in [&m.skipped, &h.skipped, &s.skipped] {
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], AppError::MalformedRecord { index: 1, .. }));
    }
}

#[test]
fn history_caps_slots_and_counts_hidden() {
    let scans: Vec<ScanEvent> = (0..12)
        .map(|m| ScanEvent::new(4_i64, format!("2025-05-02 09:{m:02}").as_str()))
        .collect();

    let h = build_scan_history(&[], &scans, 10);
    assert_eq!(h.rows.len(), 1);
    assert_eq!(h.rows[0].scans.len(), 10);
    assert_eq!(h.rows[0].hidden, 2);
}

#[test]
fn badge_layout_spills_onto_a_second_page() {
    let people: Vec<Attendee> = (1..=7)
        .map(|i| Attendee::new(i, format!("P{i}"), "p@example.org"))
        .collect();

    let layout = layout_badges(&people, &BadgeGeometry::default()).unwrap();
    assert_eq!(layout.cards_per_page, 6);
    assert_eq!(layout.page_count(), 2);
    assert!(layout.placements[6].starts_new_page(6));
    assert_eq!(layout.placements[6].attendee.badge_id, 7);
}
