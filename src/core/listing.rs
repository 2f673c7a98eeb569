use crate::config::Config;
use crate::core::crediting::build_raw_scan_summary;
use crate::db::pool::DbPool;
use crate::db::queries::{get_all_attendees, get_scan_log, load_ce_report, scans_to_events};
use crate::errors::AppResult;
use crate::export::Tabular;
use crate::models::session::{SESSION_TIME_FORMAT, Schedule};
use crate::ui::messages::{header, info, skipped_records};
use crate::utils::table::Table;
use chrono::NaiveDate;

/// Console listings of the registry and the schedule.
pub struct ListLogic;

impl ListLogic {
    pub fn attendees(pool: &mut DbPool, with_scans: bool) -> AppResult<()> {
        let attendees = get_all_attendees(&pool.conn)?;
        if attendees.is_empty() {
            info("No registered attendees.");
            return Ok(());
        }

        header("ATTENDEES");

        let table = if with_scans {
            let scans = scans_to_events(&get_scan_log(&pool.conn)?);
            let summary = build_raw_scan_summary(&attendees, &scans);
            skipped_records(&summary.skipped);
            Table::fitted(&summary.headers(), &summary.rows())
        } else {
            let headers = vec!["Badge ID".to_string(), "Name".to_string(), "Email".to_string()];
            let rows: Vec<Vec<String>> = attendees
                .iter()
                .map(|a| vec![a.badge_id.to_string(), a.name.clone(), a.email.clone()])
                .collect();
            Table::fitted(&headers, &rows)
        };

        print!("{}", table.render());
        println!("\n{} attendee(s)", attendees.len());
        Ok(())
    }

    pub fn sessions(cfg: &Config, date: Option<NaiveDate>) -> AppResult<()> {
        let full = cfg.schedule()?;
        let schedule = match date {
            Some(d) => full.for_day(d),
            None => full,
        };

        if schedule.is_empty() {
            match date {
                Some(d) => info(format!("No sessions scheduled on {d}.")),
                None => info("No sessions configured."),
            }
            return Ok(());
        }

        header("SESSIONS");
        print!("{}", session_table(&schedule).render());
        Ok(())
    }

    /// A report previously stored with `report --save`.
    pub fn saved_report(pool: &mut DbPool, date: NaiveDate) -> AppResult<()> {
        let saved = load_ce_report(&pool.conn, date)?;
        if saved.is_empty() {
            info(format!("No saved report for {date}."));
            return Ok(());
        }

        header(format!("CE REPORT {date}"));

        let headers: Vec<String> = ["Badge ID", "Name", "Email", "Credits", "Sessions"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows: Vec<Vec<String>> = saved
            .iter()
            .map(|r| {
                let attended: Vec<&str> = r
                    .sessions
                    .iter()
                    .filter(|m| m.attended)
                    .map(|m| m.title.as_str())
                    .collect();
                vec![
                    r.badge_id.to_string(),
                    r.name.clone(),
                    r.email.clone(),
                    format!("{}/{}", attended.len(), r.sessions.len()),
                    attended.join("; "),
                ]
            })
            .collect();

        print!("{}", Table::fitted(&headers, &rows).render());
        Ok(())
    }
}

fn session_table(schedule: &Schedule) -> Table {
    let headers = vec!["#".to_string(), "Title".to_string(), "Start".to_string(), "End".to_string()];
    let rows: Vec<Vec<String>> = schedule
        .sessions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            vec![
                (i + 1).to_string(),
                s.title.clone(),
                s.start.format(SESSION_TIME_FORMAT).to_string(),
                s.end.format("%H:%M").to_string(),
            ]
        })
        .collect();
    Table::fitted(&headers, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::Session;

    #[test]
    fn session_rows_are_numbered_in_order() {
        let schedule = Schedule::new(vec![
            Session::parse("Keynote", "2025-05-02 08:30", "2025-05-02 10:00").unwrap(),
            Session::parse("Panel", "2025-05-02 10:30", "2025-05-02 12:00").unwrap(),
        ]);
        let t = session_table(&schedule);
        assert_eq!(t.rows[1], vec!["2", "Panel", "2025-05-02 10:30", "12:00"]);
    }
}
