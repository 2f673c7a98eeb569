use crate::config::Config;
use crate::core::crediting::{build_credit_matrix, build_raw_scan_summary, build_scan_history};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{get_all_attendees, get_scan_log, save_ce_report, scans_to_events};
use crate::errors::AppResult;
use crate::export::{ExportFormat, RawScanLog, Tabular, ensure_writable, export_table};
use crate::ui::messages::{info, skipped_records, success, warning};
use crate::utils::date::default_report_day;
use chrono::NaiveDate;
use std::path::Path;

/// Where and how a report is written.
#[derive(Debug, Clone)]
pub struct OutputTarget<'a> {
    pub file: &'a str,
    pub format: ExportFormat,
    pub force: bool,
}

impl OutputTarget<'_> {
    fn write(&self, table: &dyn Tabular, title: &str) -> AppResult<()> {
        ensure_writable(self.file, self.force)?;
        export_table(table, self.format, Path::new(self.file), title)
    }
}

/// Reports built from the registry and the scan log.
pub struct ReportLogic;

impl ReportLogic {
    /// CE credit matrix. With `date`, only sessions starting on that day
    /// become columns. A saved report always covers a single day: without
    /// `date` the day is picked by `default_report_day`.
    pub fn credit_report(
        pool: &mut DbPool,
        cfg: &Config,
        target: &OutputTarget<'_>,
        date: Option<NaiveDate>,
        save: bool,
    ) -> AppResult<()> {
        let full = cfg.schedule()?;
        let day = if save {
            default_report_day(date, &full.days())
        } else {
            date
        };
        let schedule = match day {
            Some(d) => full.for_day(d),
            None => full,
        };

        if schedule.is_empty() {
            match day {
                Some(d) => info(format!("No sessions scheduled on {d}.")),
                None => info("No sessions configured."),
            }
        }

        let attendees = get_all_attendees(&pool.conn)?;
        let scans = scans_to_events(&get_scan_log(&pool.conn)?);
        let matrix = build_credit_matrix(&attendees, &scans, &schedule);

        skipped_records(&matrix.skipped);
        let unregistered = matrix.unregistered().count();
        if unregistered > 0 {
            warning(format!(
                "{unregistered} scanned badge(s) are not in the registry"
            ));
        }

        let title = match day {
            Some(d) => format!("CE Credit Report {d}"),
            None => "CE Credit Report".to_string(),
        };
        target.write(&matrix, &title)?;

        if save {
            match day {
                Some(day) => {
                    let n = save_ce_report(&mut pool.conn, day, &matrix)?;
                    ttlog_quiet(
                        &pool.conn,
                        "report_saved",
                        &day.to_string(),
                        &format!("{n} rows"),
                    );
                    success(format!("Saved {n} report row(s) for {day}"));
                }
                None => warning("No report day available; report not saved."),
            }
        }

        ttlog_quiet(
            &pool.conn,
            "report",
            target.format.as_str(),
            &format!("CE report written to {}", target.file),
        );
        Ok(())
    }

    /// Per-badge scan history, `max_scan_slots` timestamp columns.
    pub fn history(pool: &mut DbPool, cfg: &Config, target: &OutputTarget<'_>) -> AppResult<()> {
        let attendees = get_all_attendees(&pool.conn)?;
        let scans = scans_to_events(&get_scan_log(&pool.conn)?);
        let history = build_scan_history(&attendees, &scans, cfg.max_scan_slots);

        skipped_records(&history.skipped);
        let truncated = history.rows.iter().filter(|r| r.hidden > 0).count();
        if truncated > 0 {
            warning(format!(
                "{truncated} badge(s) have more than {} scans; extra scans are not shown",
                cfg.max_scan_slots
            ));
        }

        target.write(&history, "Scan History")?;
        ttlog_quiet(&pool.conn, "history", target.format.as_str(), target.file);
        Ok(())
    }

    /// Registered attendees with all their scans on one line.
    pub fn summary(pool: &mut DbPool, target: &OutputTarget<'_>) -> AppResult<()> {
        let attendees = get_all_attendees(&pool.conn)?;
        let scans = scans_to_events(&get_scan_log(&pool.conn)?);
        let summary = build_raw_scan_summary(&attendees, &scans);

        skipped_records(&summary.skipped);
        target.write(&summary, "Raw Scan Summary")?;
        ttlog_quiet(&pool.conn, "summary", target.format.as_str(), target.file);
        Ok(())
    }

    /// The scan log exactly as stored.
    pub fn raw(pool: &mut DbPool, target: &OutputTarget<'_>) -> AppResult<()> {
        let records = get_scan_log(&pool.conn)?;
        if records.is_empty() {
            warning("The scan log is empty.");
        }

        target.write(&RawScanLog(&records), "Scan Log")?;
        ttlog_quiet(&pool.conn, "raw", target.format.as_str(), target.file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::queries::{load_ce_report, log_scan, register_attendee};
    use crate::models::session::SessionSpec;
    use chrono::NaiveDateTime;

    fn setup() -> (DbPool, Config) {
        let mut pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();

        let alice = register_attendee(&mut pool.conn, "Alice", "alice@example.org").unwrap();
        let at = NaiveDateTime::parse_from_str("2025-05-02 09:00", "%Y-%m-%d %H:%M").unwrap();
        log_scan(&pool.conn, "1", Some(&alice), at, "test").unwrap();

        let cfg = Config {
            sessions: vec![
                SessionSpec::new("Day 1 AM", "2025-05-02 08:30", "2025-05-02 10:00"),
                SessionSpec::new("Day 2 AM", "2025-05-03 08:30", "2025-05-03 10:00"),
            ],
            ..Config::default()
        };
        (pool, cfg)
    }

    fn out_file(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("rcheckin_report_{}_{name}", std::process::id()))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn per_day_report_is_saved() {
        let (mut pool, cfg) = setup();
        let file = out_file("day1.csv");
        let target = OutputTarget {
            file: &file,
            format: ExportFormat::Csv,
            force: true,
        };
        let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        ReportLogic::credit_report(&mut pool, &cfg, &target, Some(day), true).unwrap();

        let csv = std::fs::read_to_string(&file).unwrap();
        assert!(csv.starts_with("Badge ID,Name,Email,Day 1 AM\n"));
        assert!(!csv.contains("Day 2 AM"));

        let saved = load_ce_report(&pool.conn, day).unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].sessions[0].attended);

        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn saving_without_date_keeps_one_day() {
        let (mut pool, cfg) = setup();
        let file = out_file("default_day.csv");
        let target = OutputTarget {
            file: &file,
            format: ExportFormat::Csv,
            force: true,
        };

        ReportLogic::credit_report(&mut pool, &cfg, &target, None, true).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let saved = load_ce_report(&pool.conn, day).unwrap();
        assert_eq!(saved.len(), 1);
        let titles: Vec<&str> = saved[0].sessions.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Day 1 AM"]);

        let csv = std::fs::read_to_string(&file).unwrap();
        assert!(!csv.contains("Day 2 AM"));

        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn relative_output_path_is_rejected() {
        let (mut pool, cfg) = setup();
        let target = OutputTarget {
            file: "report.csv",
            format: ExportFormat::Csv,
            force: true,
        };
        assert!(ReportLogic::credit_report(&mut pool, &cfg, &target, None, false).is_err());
    }
}
