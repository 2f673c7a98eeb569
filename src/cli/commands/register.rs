use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checkin::CheckinLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Register { name, email } = cmd {
        let mut pool = open_db(&cfg.database)?;
        CheckinLogic::register(&mut pool, name, email)?;
    }
    Ok(())
}
