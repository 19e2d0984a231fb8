pub mod locator;
pub mod sessions;
pub mod stats;
pub mod types;

pub use locator::SessionLocator;
pub use sessions::list_sessions;
pub use stats::UsageAnalyzer;
pub use types::*;

use std::path::PathBuf;

/// Default session log root: `~/.neovate/projects`.
pub fn default_log_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".neovate").join("projects"))
}
