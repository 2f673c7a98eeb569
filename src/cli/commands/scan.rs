use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checkin::CheckinLogic;
use crate::core::normalize::normalize_timestamp;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::scan::RawTimestamp;
use crate::utils::date::now_seconds;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { badge, at } = cmd {
        let at = match at {
            Some(s) => normalize_timestamp(&RawTimestamp::Text(s.clone()))?,
            None => now_seconds(),
        };

        let mut pool = open_db(&cfg.database)?;
        CheckinLogic::scan(&mut pool, cfg, badge, at)?;
    }
    Ok(())
}
