use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::listing::ListLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Attendees { scans } = cmd {
        let mut pool = open_db(&cfg.database)?;
        ListLogic::attendees(&mut pool, *scans)?;
    }
    Ok(())
}
