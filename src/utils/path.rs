//! Path helpers for the database and export targets.

use std::path::{Path, PathBuf};

/// Replace a leading `~/` with the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

pub fn is_absolute(path: &str) -> bool {
    Path::new(path).is_absolute()
}

/// Absolute paths (after tilde expansion) are kept; bare names land in `base`.
pub fn resolve_in(base: &Path, path: &str) -> PathBuf {
    let p = expand_tilde(path);
    if p.is_absolute() { p } else { base.join(p) }
}
