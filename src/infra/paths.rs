// src/infra/paths.rs — Config path management
//
// PROMPTLAB_HOME relocates everything (used by tests and sandboxes).
// When unset, config lives under ~/.promptlab/.

use std::path::PathBuf;

/// Returns the PROMPTLAB_HOME override, if set.
fn promptlab_home() -> Option<PathBuf> {
    std::env::var_os("PROMPTLAB_HOME").map(PathBuf::from)
}

/// Configuration directory: $PROMPTLAB_HOME/ or ~/.promptlab/
///
/// Returns `None` only when no home directory can be determined and no
/// override is set.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = promptlab_home() {
        return Some(home);
    }
    dirs_home().map(|h| h.join(".promptlab"))
}

/// Home directory
pub fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf())
}

/// Config file path
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}
