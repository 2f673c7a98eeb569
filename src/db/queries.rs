use crate::core::crediting::{CreditMatrix, SessionMark};
use crate::errors::{AppError, AppResult};
use crate::models::attendee::Attendee;
use crate::models::scan::{RawBadgeId, RawTimestamp, ScanEvent};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use serde::Serialize;

/// Storage format of scan timestamps written by this application.
pub const SCAN_STORE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A row of the `scans` table, exactly as stored.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub id: i64,
    pub badge_id: RawBadgeId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub timestamp: String,
    pub source: String,
}

impl ScanRecord {
    pub fn to_event(&self) -> ScanEvent {
        ScanEvent {
            badge_id: self.badge_id.clone(),
            timestamp: RawTimestamp::Text(self.timestamp.clone()),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

pub fn scans_to_events(records: &[ScanRecord]) -> Vec<ScanEvent> {
    records.iter().map(ScanRecord::to_event).collect()
}

fn map_attendee(row: &Row) -> Result<Attendee> {
    Ok(Attendee {
        badge_id: row.get("badge_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}

/// The scanner may have stored the badge as INTEGER or TEXT; keep both.
fn map_scan(row: &Row) -> Result<ScanRecord> {
    let badge_id = match row.get::<_, Value>("badge_id")? {
        Value::Integer(n) => RawBadgeId::Int(n),
        Value::Text(s) => RawBadgeId::Text(s),
        Value::Real(f) => RawBadgeId::Text(f.to_string()),
        Value::Null => RawBadgeId::Text(String::new()),
        Value::Blob(b) => RawBadgeId::Text(String::from_utf8_lossy(&b).into_owned()),
    };

    Ok(ScanRecord {
        id: row.get("id")?,
        badge_id,
        name: row.get("name")?,
        email: row.get("email")?,
        timestamp: row.get("timestamp")?,
        source: row.get("source")?,
    })
}

// ---------------------------
// Attendees
// ---------------------------

/// Next sequential badge id: highest assigned + 1, or 1 on an empty registry.
pub fn next_badge_id(conn: &Connection) -> AppResult<i64> {
    let max: Option<i64> = conn.query_row("SELECT MAX(badge_id) FROM attendees", [], |row| {
        row.get(0)
    })?;
    Ok(max.map_or(1, |m| m + 1))
}

pub fn register_attendee(conn: &mut Connection, name: &str, email: &str) -> AppResult<Attendee> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Other("attendee name cannot be empty".to_string()));
    }

    let tx = conn.transaction()?;
    let badge_id = next_badge_id(&tx)?;

    tx.execute(
        "INSERT INTO attendees (badge_id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![badge_id, name, email.trim(), Local::now().to_rfc3339()],
    )?;
    tx.commit()?;

    Ok(Attendee::new(badge_id, name, email.trim()))
}

pub fn get_all_attendees(conn: &Connection) -> AppResult<Vec<Attendee>> {
    let mut stmt =
        conn.prepare_cached("SELECT badge_id, name, email FROM attendees ORDER BY badge_id ASC")?;
    let rows = stmt.query_map([], map_attendee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_attendee(conn: &Connection, badge_id: i64) -> AppResult<Option<Attendee>> {
    let mut stmt =
        conn.prepare_cached("SELECT badge_id, name, email FROM attendees WHERE badge_id = ?1")?;
    Ok(stmt.query_row([badge_id], map_attendee).optional()?)
}

// ---------------------------
// Scans
// ---------------------------

/// Append a scan. The identity known at scan time is copied along with it.
pub fn log_scan(
    conn: &Connection,
    badge: &str,
    known: Option<&Attendee>,
    at: NaiveDateTime,
    source: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO scans (badge_id, name, email, timestamp, source)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            badge.trim(),
            known.map(|a| a.name.as_str()),
            known.map(|a| a.email.as_str()),
            at.format(SCAN_STORE_FORMAT).to_string(),
            source,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_scan_log(conn: &Connection) -> AppResult<Vec<ScanRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, badge_id, name, email, timestamp, source FROM scans ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], map_scan)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Saved CE reports
// ---------------------------

#[derive(Debug, Clone)]
pub struct SavedReportRow {
    pub badge_id: i64,
    pub name: String,
    pub email: String,
    pub sessions: Vec<SessionMark>,
}

/// Store the credit matrix for `date`, replacing any earlier save for the
/// same date. Returns the number of rows written.
pub fn save_ce_report(
    conn: &mut Connection,
    date: NaiveDate,
    matrix: &CreditMatrix,
) -> AppResult<usize> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let now = Local::now().to_rfc3339();

    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM ce_reports WHERE report_date = ?1",
        params![date_str],
    )?;

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO ce_reports (report_date, badge_id, name, email, sessions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        for row in &matrix.rows {
            let sessions = serde_json::to_string(&row.marks)
                .map_err(|e| AppError::Export(format!("cannot encode sessions: {e}")))?;
            stmt.execute(params![
                date_str,
                row.identity.badge_id,
                row.identity.name,
                row.identity.email,
                sessions,
                now,
            ])?;
        }
    }

    tx.commit()?;
    Ok(matrix.rows.len())
}

pub fn load_ce_report(conn: &Connection, date: NaiveDate) -> AppResult<Vec<SavedReportRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT badge_id, name, email, sessions FROM ce_reports
         WHERE report_date = ?1
         ORDER BY badge_id ASC",
    )?;

    let rows = stmt.query_map([date.format("%Y-%m-%d").to_string()], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (badge_id, name, email, sessions_json) = r?;
        let sessions = serde_json::from_str(&sessions_json)
            .map_err(|e| AppError::Other(format!("corrupt saved report row {badge_id}: {e}")))?;
        out.push(SavedReportRow {
            badge_id,
            name,
            email,
            sessions,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crediting::build_credit_matrix;
    use crate::db::initialize::init_db;
    use crate::models::session::{Schedule, Session};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn badge_ids_are_sequential_from_one() {
        let mut c = conn();
        assert_eq!(next_badge_id(&c).unwrap(), 1);

        let a = register_attendee(&mut c, "Alice", "alice@example.org").unwrap();
        let b = register_attendee(&mut c, " Bob ", "bob@example.org").unwrap();
        assert_eq!((a.badge_id, b.badge_id), (1, 2));
        assert_eq!(b.name, "Bob");

        let all = get_all_attendees(&c).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(find_attendee(&c, 2).unwrap().unwrap().email, "bob@example.org");
        assert!(find_attendee(&c, 3).unwrap().is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut c = conn();
        assert!(register_attendee(&mut c, "  ", "x@example.org").is_err());
    }

    #[test]
    fn scan_log_keeps_raw_badge_text() {
        let mut c = conn();
        let alice = register_attendee(&mut c, "Alice", "alice@example.org").unwrap();

        log_scan(&c, "1", Some(&alice), at("2025-05-02 09:00"), "cli").unwrap();
        log_scan(&c, " 77 ", None, at("2025-05-02 09:05"), "cli").unwrap();
        c.execute(
            "INSERT INTO scans (badge_id, timestamp) VALUES (5, 'datetime.datetime(2025, 5, 2, 9, 0)')",
            [],
        )
        .unwrap();

        let log = get_scan_log(&c).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].badge_id, RawBadgeId::Text("1".into()));
        assert_eq!(log[0].name.as_deref(), Some("Alice"));
        assert_eq!(log[0].timestamp, "2025-05-02T09:00:00");
        assert_eq!(log[1].badge_id, RawBadgeId::Text("77".into()));
        assert_eq!(log[2].badge_id, RawBadgeId::Text("5".into()));
        assert_eq!(log[2].source, "cli");
    }

    #[test]
    fn saving_a_report_replaces_the_previous_one() {
        let mut c = conn();
        let alice = register_attendee(&mut c, "Alice", "alice@example.org").unwrap();
        log_scan(&c, "1", Some(&alice), at("2025-05-02 09:00"), "cli").unwrap();

        let schedule = Schedule::new(vec![
            Session::parse("A", "2025-05-02 08:30", "2025-05-02 10:00").unwrap(),
        ]);
        let attendees = get_all_attendees(&c).unwrap();
        let scans = scans_to_events(&get_scan_log(&c).unwrap());
        let matrix = build_credit_matrix(&attendees, &scans, &schedule);

        let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        assert_eq!(save_ce_report(&mut c, day, &matrix).unwrap(), 1);
        assert_eq!(save_ce_report(&mut c, day, &matrix).unwrap(), 1);

        let saved = load_ce_report(&c, day).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Alice");
        assert!(saved[0].sessions[0].attended);
    }
}
