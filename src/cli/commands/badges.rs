use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::badges::BadgeLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Badges { file, force } = cmd {
        let mut pool = open_db(&cfg.database)?;
        BadgeLogic::print_sheet(&mut pool, cfg, file, *force)?;
    }
    Ok(())
}
