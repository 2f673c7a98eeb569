#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, with HOME pointed at a private directory so no real
/// configuration file is picked up.
pub fn rci() -> Command {
    let mut home: PathBuf = env::temp_dir();
    home.push("rcheckin_test_home");
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("rcheckin");
    cmd.env("HOME", &home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rcheckin.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init_db(db_path: &str) {
    rci()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn register(db_path: &str, name: &str, email: &str) {
    rci()
        .args(["--db", db_path, "register", name, email])
        .assert()
        .success();
}

pub fn scan(db_path: &str, badge: &str, at: &str) {
    rci()
        .args(["--db", db_path, "scan", badge, "--at", at])
        .assert()
        .success();
}

/// Two attendees on day one of the built-in schedule:
/// Alice (#1) attends the first two sessions, Bob (#2) only the afternoon.
pub fn init_db_with_data(db_path: &str) {
    init_db(db_path);
    register(db_path, "Alice Smith", "alice@example.org");
    register(db_path, "Bob Jones", "bob@example.org");

    scan(db_path, "1", "2025-05-02 08:45");
    scan(db_path, "1", "2025-05-02 10:31");
    scan(db_path, "2", "2025-05-02 14:00");
}

/// Insert a scan row directly, bypassing the CLI (legacy or broken data).
pub fn insert_raw_scan(db_path: &str, badge: &str, timestamp: &str) {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.execute(
        "INSERT INTO scans (badge_id, timestamp, source) VALUES (?1, ?2, 'import')",
        [badge, timestamp],
    )
    .expect("insert scan");
}
