//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (config dir holds settings and the history store):
//!
//!   Windows: %APPDATA%\lingofix\
//!   macOS:   ~/Library/Application Support/lingofix/
//!   Linux:   ~/.config/lingofix/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory backing the key-value store (one `<key>.json` per key).
    pub storage_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "lingofix";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let storage_dir = config_dir.join("storage");

        Self {
            config_dir,
            settings_file,
            storage_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
