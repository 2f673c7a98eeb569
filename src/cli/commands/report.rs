use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::listing::ListLogic;
use crate::core::report::{OutputTarget, ReportLogic};
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::utils::date::parse_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        format,
        file,
        date,
        save,
        force,
    } = cmd
    {
        let date = date.as_deref().map(parse_date).transpose()?;
        let target = OutputTarget {
            file,
            format: *format,
            force: *force,
        };

        let mut pool = open_db(&cfg.database)?;
        ReportLogic::credit_report(&mut pool, cfg, &target, date, *save)?;
    }
    Ok(())
}

/// `saved --date D`
pub fn handle_saved(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Saved { date } = cmd {
        let date = parse_date(date)?;
        let mut pool = open_db(&cfg.database)?;
        ListLogic::saved_report(&mut pool, date)?;
    }
    Ok(())
}
