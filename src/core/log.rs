use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

const MAX_OP_WIDTH: usize = 60;

fn ansi_escape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI escape regex"))
}

fn strip_ansi(s: &str) -> String {
    ansi_escape().replace_all(s, "").into_owned()
}

/// Restituisce il colore ANSI in base all'operazione
fn color_for_operation(op: &str) -> Colour {
    match op {
        "register" => Colour::Green,
        "scan" => Colour::Cyan,
        "report" | "history" | "summary" | "raw" => Colour::Blue,
        "report_saved" => Colour::Yellow,
        "badges" => Colour::RGB(255, 153, 51),
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("migrat") => Colour::Purple,
        _ => Colour::White,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    /// Operation and target in a single column.
    fn op_target(&self) -> String {
        if self.target.is_empty() {
            self.operation.clone()
        } else {
            format!("{} ({})", self.operation, self.target)
        }
    }

    /// Op column with only the operation word coloured, cut at
    /// `MAX_OP_WIDTH` visible characters.
    fn painted_op_target(&self) -> String {
        let visible = self.op_target();
        let truncated = if visible.chars().count() > MAX_OP_WIDTH {
            let mut s: String = visible.chars().take(MAX_OP_WIDTH - 3).collect();
            s.push_str("...");
            s
        } else {
            visible
        };

        let color = color_for_operation(&self.operation);
        match truncated.split_once(' ') {
            Some((op, rest)) => format!("{} {}", color.paint(op), rest),
            None => color.paint(truncated.as_str()).to_string(),
        }
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn load(pool: &DbPool) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        Ok(entries)
    }

    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let entries = Self::load(pool)?;
        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| e.op_target().chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(0);

        println!("📜 Internal log:\n");

        for e in &entries {
            let painted = e.painted_op_target();
            // padding calcolato sulla larghezza visibile, senza ANSI
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&painted).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                painted,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::log::ttlog;

    #[test]
    fn painted_column_strips_back_to_plain_text() {
        let e = LogEntry {
            id: 1,
            date: String::new(),
            operation: "scan".into(),
            target: "42".into(),
            message: String::new(),
        };
        assert_eq!(strip_ansi(&e.painted_op_target()), "scan (42)");
    }

    #[test]
    fn long_targets_are_truncated() {
        let e = LogEntry {
            id: 1,
            date: String::new(),
            operation: "report".into(),
            target: "x".repeat(100),
            message: String::new(),
        };
        let plain = strip_ansi(&e.painted_op_target());
        assert_eq!(plain.chars().count(), MAX_OP_WIDTH);
        assert!(plain.ends_with("..."));
    }

    #[test]
    fn entries_load_in_insertion_order() {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        ttlog(&pool.conn, "register", "1", "first").unwrap();
        ttlog(&pool.conn, "scan", "1", "second").unwrap();

        let entries = LogLogic::load(&pool).unwrap();
        let ops: Vec<&str> = entries.iter().map(|e| e.operation.as_str()).collect();
        assert!(ops.ends_with(&["register", "scan"]));
    }
}
