use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::{OutputTarget, ReportLogic};
use crate::db::initialize::open_db;
use crate::errors::AppResult;

/// `history`, `summary` and `raw`: scan log exports.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (format, file, force) = match cmd {
        Commands::History {
            format,
            file,
            force,
        }
        | Commands::Summary {
            format,
            file,
            force,
        }
        | Commands::Raw {
            format,
            file,
            force,
        } => (*format, file, *force),
        _ => return Ok(()),
    };

    let target = OutputTarget {
        file,
        format,
        force,
    };
    let mut pool = open_db(&cfg.database)?;

    match cmd {
        Commands::History { .. } => ReportLogic::history(&mut pool, cfg, &target),
        Commands::Summary { .. } => ReportLogic::summary(&mut pool, &target),
        _ => ReportLogic::raw(&mut pool, &target),
    }
}
