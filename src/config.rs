use std::path::PathBuf;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default interval between update checks in milliseconds (24 hours)
pub const DEFAULT_CHECK_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Deadline for the registry connectivity probe in milliseconds (5 seconds)
pub const PING_TIMEOUT_MS: u64 = 5_000;

// =============================================================================
// Registry and storage defaults
// =============================================================================

/// Distribution tag queried when the caller does not name one
pub const DEFAULT_DIST_TAG: &str = "latest";

/// Prefix for persisted record keys, keeping them clear of records other
/// tools may keep for the same package name
pub const SETTINGS_NAMESPACE: &str = "update-notify";

/// Returns the path to the data directory for update-notify.
/// Uses $XDG_DATA_HOME/update-notify if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/update-notify,
/// or ./update-notify if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the persisted settings document.
pub fn settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("update-notify")
}
