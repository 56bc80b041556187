//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variables consulted, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the correction + translation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the generative-language endpoint.
    pub base_url: String,
    /// API key sent as `x-goog-api-key`.  `None` falls back to the
    /// environment (see [`API_KEY_ENV_VARS`]).
    pub api_key: Option<String>,
    /// Model used for correction + translation.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for any service response.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-3-flash-preview".into(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// Fill `api_key` from the first non-empty variable returned by `lookup`
    /// when the file did not provide one.
    pub fn apply_env_key(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if has_key {
            return;
        }
        self.api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.is_empty());
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the text-to-speech request and playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Model used for speech synthesis.
    pub model: String,
    /// Prebuilt voice selector.
    pub voice_name: String,
    /// Sample rate of the returned PCM payload in Hz.
    pub sample_rate: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-preview-tts".into(),
            voice_name: "Kore".into(),
            sample_rate: 24_000,
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryConfig
// ---------------------------------------------------------------------------

/// Settings for the session history store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of retained items; older ones are evicted.  Values
    /// above the default of 50 are clamped to 50.
    pub max_items: usize,
    /// Key under which the history is persisted.
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: crate::history::DEFAULT_CAPACITY,
            storage_key: crate::history::HISTORY_KEY.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Show the "Language Tip" explanation under each result.
    pub show_explanation: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (960.0, 720.0),
            show_explanation: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use lingofix::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Correction + translation service settings.
    pub llm: LlmConfig,
    /// Speech synthesis settings.
    pub speech: SpeechConfig,
    /// History store settings.
    pub history: HistoryConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`,
    /// then fill a missing API key from the environment.
    ///
    /// Returns the default configuration when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&AppPaths::new().settings_file)?;
        config.llm.apply_env_key(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Like [`load`](Self::load), but an unreadable or malformed file falls
    /// back to defaults.  The environment API key is applied either way.
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(&AppPaths::new().settings_file, |name| {
            std::env::var(name).ok()
        })
    }

    /// [`load_or_default`](Self::load_or_default) against an explicit path
    /// and environment lookup (useful for tests).
    pub fn load_or_default_from(
        path: &std::path::Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::load_from(path).unwrap_or_else(|e| {
            log::warn!("Failed to load config from {} ({e}); using defaults", path.display());
            Self::default()
        });
        config.llm.apply_env_key(lookup);
        config
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
