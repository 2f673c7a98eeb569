use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::listing::ListLogic;
use crate::errors::AppResult;
use crate::utils::date::parse_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions { date } = cmd {
        let date = date.as_deref().map(parse_date).transpose()?;
        ListLogic::sessions(cfg, date)?;
    }
    Ok(())
}
