//! Business logic: pure crediting and layout engines plus the
//! per-command logic that wires them to the database and the exporters.

pub mod badges;
pub mod checkin;
pub mod crediting;
pub mod layout;
pub mod listing;
pub mod log;
pub mod normalize;
pub mod report;
