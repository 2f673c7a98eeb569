use crate::config::Config;
use crate::core::layout::layout_badges;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::get_all_attendees;
use crate::errors::AppResult;
use crate::export::{ensure_writable, export_badge_sheet};
use crate::ui::messages::{info, warning};
use std::path::Path;

/// Printable badge sheets for the registry.
pub struct BadgeLogic;

impl BadgeLogic {
    /// Lay out every registered attendee, in badge order, and write the
    /// sheet as PDF. Returns the number of pages written.
    pub fn print_sheet(pool: &mut DbPool, cfg: &Config, file: &str, force: bool) -> AppResult<usize> {
        let attendees = get_all_attendees(&pool.conn)?;
        if attendees.is_empty() {
            warning("No registered attendees. Nothing to print.");
            return Ok(0);
        }

        // Reject bad geometry before touching the output file.
        let layout = layout_badges(&attendees, &cfg.badge)?;
        ensure_writable(file, force)?;

        info(format!(
            "{} badge(s), {} per page ({} row(s) of {})",
            attendees.len(),
            layout.cards_per_page,
            layout.rows_per_page,
            cfg.badge.columns
        ));
        export_badge_sheet(&layout, &cfg.badge, Path::new(file))?;

        let pages = layout.page_count();
        ttlog_quiet(
            &pool.conn,
            "badges",
            file,
            &format!("{} badges on {pages} page(s)", attendees.len()),
        );
        Ok(pages)
    }
}
