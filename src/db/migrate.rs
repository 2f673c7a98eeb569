use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Registered attendees. Badge ids are assigned by the application.
fn create_attendees_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendees (
            badge_id    INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Append-only scan log. `badge_id` keeps whatever the scanner decoded;
/// normalization happens when reports are built.
fn create_scans_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS scans (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            badge_id    TEXT NOT NULL,
            name        TEXT,
            email       TEXT,
            timestamp   TEXT NOT NULL,
            source      TEXT NOT NULL DEFAULT 'cli'
        );

        CREATE INDEX IF NOT EXISTS idx_scans_badge ON scans(badge_id);
        "#,
    )?;
    Ok(())
}

fn create_ce_reports_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS ce_reports (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            report_date  TEXT NOT NULL,
            badge_id     INTEGER NOT NULL,
            name         TEXT NOT NULL,
            email        TEXT NOT NULL,
            sessions     TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ce_reports_date ON ce_reports(report_date);
        "#,
    )?;
    Ok(())
}

/// Early scan logs had no `source` column.
fn migrate_add_source_to_scans(conn: &Connection) -> Result<()> {
    if has_column(conn, "scans", "source")? {
        return Ok(());
    }

    conn.execute(
        "ALTER TABLE scans ADD COLUMN source TEXT NOT NULL DEFAULT 'legacy'",
        [],
    )?;
    success("Added 'source' column to scans table.");
    Ok(())
}

pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Internal log
    ensure_log_table(conn)?;

    // 2) Registry
    create_attendees_table(conn)?;

    // 3) Scan log (create or upgrade)
    if table_exists(conn, "scans")? {
        migrate_add_source_to_scans(conn)?;
        conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_scans_badge ON scans(badge_id);")?;
    } else {
        create_scans_table(conn)?;
    }

    // 4) Saved CE reports
    create_ce_reports_table(conn)?;

    Ok(())
}
