//! Default paths for curfewd components
//!
//! Paths are user-writable by default (no root required):
//! - Policy file: `$XDG_CONFIG_HOME/curfewd/curfew.toml` or `~/.config/curfewd/curfew.toml`
//! - Data: `$XDG_DATA_HOME/curfewd` or `~/.local/share/curfewd`

use std::path::PathBuf;

/// Environment variable for overriding the policy file path
pub const CURFEW_CONFIG_ENV: &str = "CURFEW_CONFIG";

/// Environment variable for overriding the data directory
pub const CURFEW_DATA_DIR_ENV: &str = "CURFEW_DATA_DIR";

/// Policy filename within the config directory
const CONFIG_FILENAME: &str = "curfew.toml";

/// Application subdirectory name
const APP_DIR: &str = "curfewd";

/// Get the default policy file path.
///
/// Order of precedence:
/// 1. `$CURFEW_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/curfewd/curfew.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/curfewd/curfew.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CURFEW_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory (holds the audit database).
///
/// Order of precedence:
/// 1. `$CURFEW_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/curfewd` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/curfewd` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(CURFEW_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_contains_curfewd() {
        let path = default_config_path();
        assert!(path.to_string_lossy().contains("curfew"));
        assert!(path.to_string_lossy().ends_with(".toml"));
    }

    #[test]
    fn data_dir_contains_curfewd() {
        let path = default_data_dir();
        assert!(path.to_string_lossy().contains("curfewd"));
    }
}
