use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db, rci, register, setup_test_db};

#[test]
fn test_register_assigns_sequential_badges() {
    let db_path = setup_test_db("register_sequential");
    init_db(&db_path);

    rci()
        .args(["--db", &db_path, "register", "Alice Smith", "alice@example.org"])
        .assert()
        .success()
        .stdout(contains("badge #1"));

    rci()
        .args(["--db", &db_path, "register", "Bob Jones", "bob@example.org"])
        .assert()
        .success()
        .stdout(contains("badge #2"));

    rci()
        .args(["--db", &db_path, "attendees"])
        .assert()
        .success()
        .stdout(contains("Alice Smith").and(contains("bob@example.org")));
}

#[test]
fn test_scan_registered_badge() {
    let db_path = setup_test_db("scan_registered");
    init_db(&db_path);
    register(&db_path, "Alice Smith", "alice@example.org");

    rci()
        .args(["--db", &db_path, "scan", "1", "--at", "2025-05-02 09:00"])
        .assert()
        .success()
        .stdout(contains("Checked in: Alice Smith"));
}

#[test]
fn test_scan_unregistered_badge_is_accepted() {
    let db_path = setup_test_db("scan_unregistered");
    init_db(&db_path);

    rci()
        .args(["--db", &db_path, "scan", "42", "--at", "2025-05-02 09:00"])
        .assert()
        .success()
        .stdout(contains("42").and(contains("not registered")));
}

#[test]
fn test_scan_rejects_bad_timestamp() {
    let db_path = setup_test_db("scan_bad_timestamp");
    init_db(&db_path);

    rci()
        .args(["--db", &db_path, "scan", "1", "--at", "yesterday"])
        .assert()
        .failure()
        .stderr(contains("Invalid timestamp"));
}

#[test]
fn test_attendees_with_scans_on_one_line() {
    let db_path = setup_test_db("attendees_scans");
    init_db(&db_path);
    register(&db_path, "Alice Smith", "alice@example.org");

    for at in ["2025-05-02 10:31", "2025-05-02 08:45"] {
        rci()
            .args(["--db", &db_path, "scan", "1", "--at", at])
            .assert()
            .success();
    }

    rci()
        .args(["--db", &db_path, "attendees", "--scans"])
        .assert()
        .success()
        .stdout(contains("2025-05-02 08:45:00, 2025-05-02 10:31:00"));
}

#[test]
fn test_sessions_for_one_day() {
    let db_path = setup_test_db("sessions_day");
    init_db(&db_path);

    rci()
        .args(["--db", &db_path, "sessions", "--date", "2025-05-03"])
        .assert()
        .success()
        .stdout(
            contains("Use of Polygraph Exams in Treatment")
                .and(contains("Prevention of C.M.").not()),
        );

    rci()
        .args(["--db", &db_path, "sessions", "--date", "2030-01-01"])
        .assert()
        .success()
        .stdout(contains("No sessions scheduled"));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("log_print");
    init_db(&db_path);
    register(&db_path, "Alice Smith", "alice@example.org");

    rci()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init").and(contains("Registered Alice Smith")));
}

#[test]
fn test_config_print_shows_schedule() {
    rci()
        .args(["--test", "config", "--print"])
        .assert()
        .success()
        .stdout(contains("max_scan_slots").and(contains("sessions")));
}
