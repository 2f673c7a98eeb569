use crate::config::Config;
use crate::core::normalize::normalize_badge_id;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{find_attendee, log_scan, register_attendee};
use crate::errors::{AppError, AppResult};
use crate::models::attendee::Attendee;
use crate::models::scan::RawBadgeId;
use crate::ui::messages::{success, warning};
use chrono::NaiveDateTime;

/// Source tag of scans entered from the command line.
pub const CLI_SOURCE: &str = "cli";

/// Result of a front-desk check-in.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckinOutcome {
    Registered { scan_id: i64, attendee: Attendee },
    Unregistered { scan_id: i64, badge: String },
}

/// Registration and check-in at the front desk.
pub struct CheckinLogic;

impl CheckinLogic {
    pub fn register(pool: &mut DbPool, name: &str, email: &str) -> AppResult<Attendee> {
        let attendee = register_attendee(&mut pool.conn, name, email)?;

        ttlog_quiet(
            &pool.conn,
            "register",
            &attendee.badge_id.to_string(),
            &format!("Registered {} <{}>", attendee.name, attendee.email),
        );
        success(format!(
            "Registered {} with badge #{}",
            attendee.name, attendee.badge_id
        ));

        Ok(attendee)
    }

    /// Record one badge scan at `at`.
    ///
    /// Unknown or unparsable badges are still logged (the crediting step
    /// reports them) unless `strict_checkin` is set.
    pub fn scan(
        pool: &mut DbPool,
        cfg: &Config,
        badge: &str,
        at: NaiveDateTime,
    ) -> AppResult<CheckinOutcome> {
        let known = match normalize_badge_id(&RawBadgeId::Text(badge.to_string())) {
            Ok(id) => {
                let found = find_attendee(&pool.conn, id)?;
                if found.is_none() && cfg.strict_checkin {
                    return Err(AppError::UnknownBadge(id));
                }
                found
            }
            Err(e) if cfg.strict_checkin => return Err(e),
            Err(_) => None,
        };

        let scan_id = log_scan(&pool.conn, badge, known.as_ref(), at, CLI_SOURCE)?;

        match known {
            Some(attendee) => {
                ttlog_quiet(
                    &pool.conn,
                    "scan",
                    &attendee.badge_id.to_string(),
                    &format!("Checked in {}", attendee.name),
                );
                success(format!("Checked in: {}", attendee.name));
                Ok(CheckinOutcome::Registered { scan_id, attendee })
            }
            None => {
                let badge = badge.trim().to_string();
                ttlog_quiet(&pool.conn, "scan", &badge, "Unregistered badge scanned");
                warning(format!("Checked in: {badge} (not registered)"));
                Ok(CheckinOutcome::Unregistered { scan_id, badge })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::queries::get_scan_log;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    fn at() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-05-02 09:00", "%Y-%m-%d %H:%M").unwrap()
    }

    fn config(strict: bool) -> Config {
        Config {
            strict_checkin: strict,
            ..Config::default()
        }
    }

    #[test]
    fn registered_scan_copies_identity() {
        let mut p = pool();
        CheckinLogic::register(&mut p, "Alice", "alice@example.org").unwrap();

        let out = CheckinLogic::scan(&mut p, &config(false), "1", at()).unwrap();
        assert!(matches!(out, CheckinOutcome::Registered { ref attendee, .. } if attendee.name == "Alice"));

        let log = get_scan_log(&p.conn).unwrap();
        assert_eq!(log[0].email.as_deref(), Some("alice@example.org"));
        assert_eq!(log[0].source, CLI_SOURCE);
    }

    #[test]
    fn unknown_badge_is_logged_when_lenient() {
        let mut p = pool();
        let out = CheckinLogic::scan(&mut p, &config(false), "42", at()).unwrap();
        assert!(matches!(out, CheckinOutcome::Unregistered { ref badge, .. } if badge == "42"));

        let garbage = CheckinLogic::scan(&mut p, &config(false), "abc", at()).unwrap();
        assert!(matches!(garbage, CheckinOutcome::Unregistered { .. }));
        assert_eq!(get_scan_log(&p.conn).unwrap().len(), 2);
    }

    #[test]
    fn strict_mode_rejects_unknown_badges() {
        let mut p = pool();
        assert!(matches!(
            CheckinLogic::scan(&mut p, &config(true), "42", at()),
            Err(AppError::UnknownBadge(42))
        ));
        assert!(matches!(
            CheckinLogic::scan(&mut p, &config(true), "x", at()),
            Err(AppError::InvalidBadgeId(_))
        ));
        assert!(get_scan_log(&p.conn).unwrap().is_empty());
    }
}
