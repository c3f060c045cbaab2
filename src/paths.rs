//! Where the log file and the config directory live.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variables that can name the config directory, in lookup order,
/// each with the path appended to the variable's value.
#[cfg(windows)]
const CONFIG_DIR_SOURCES: &[(&str, &[&str])] = &[
    ("APPDATA", &[]),
    ("USERPROFILE", &["AppData", "Roaming"]),
];

#[cfg(target_os = "macos")]
const CONFIG_DIR_SOURCES: &[(&str, &[&str])] = &[
    ("XDG_CONFIG_HOME", &[]),
    ("HOME", &["Library", "Application Support"]),
];

#[cfg(not(any(windows, target_os = "macos")))]
const CONFIG_DIR_SOURCES: &[(&str, &[&str])] = &[("XDG_CONFIG_HOME", &[]), ("HOME", &[".config"])];

/// Path to the debug log file in the OS temp directory
#[must_use]
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("branch-compare.log")
}

/// Resolve the user configuration directory for the current platform
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    config_dir_with(std::env::var_os)
}

/// First source whose variable is set and non-empty wins
fn config_dir_with(lookup: impl Fn(&'static str) -> Option<OsString>) -> Option<PathBuf> {
    CONFIG_DIR_SOURCES.iter().find_map(|&(var, suffix)| {
        let base = lookup(var).filter(|value| !value.is_empty())?;
        Some(suffix.iter().fold(PathBuf::from(base), |dir, part| dir.join(part)))
    })
}
