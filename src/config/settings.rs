use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::derive::{Mode, DEFAULT_LENGTH, DEFAULT_START};
use crate::errors::{Result, SitepassError};

/// User configuration, loaded from `.sitepass.toml`.
///
/// Every field has a sensible default so sitepass works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Location of the parameter store (relative to the config directory).
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Per-OS store locations keyed by OS family (`unix`, `windows`).
    /// Wins over `store_path` when the current family has an entry.
    #[serde(default)]
    pub store_paths: BTreeMap<String, String>,

    /// Password length offered when adding a site.
    #[serde(default = "default_length")]
    pub default_length: usize,

    /// Alphabet mode offered when adding a site.
    #[serde(default)]
    pub default_mode: Mode,

    /// Window offset used for new sites.
    #[serde(default = "default_start")]
    pub default_start: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_path() -> String {
    "sites.csv".to_string()
}

fn default_length() -> usize {
    DEFAULT_LENGTH
}

fn default_start() -> usize {
    DEFAULT_START
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            store_paths: BTreeMap::new(),
            default_length: default_length(),
            default_mode: Mode::default(),
            default_start: default_start(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = ".sitepass.toml";

    /// Load settings from `<dir>/.sitepass.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SitepassError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.default_length == 0 {
            return Err(SitepassError::ConfigError(format!(
                "{}: default_length must be at least 1",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Resolve the store location for this machine.
    ///
    /// `explicit` (the `--store` flag or `SITEPASS_STORE`) wins, then the
    /// entry for the current OS family, then `store_path`. Relative paths
    /// are joined to `base_dir`.
    pub fn store_path(&self, base_dir: &Path, explicit: Option<&Path>) -> PathBuf {
        let chosen = match explicit {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(
                self.store_paths
                    .get(std::env::consts::FAMILY)
                    .unwrap_or(&self.store_path),
            ),
        };

        if chosen.is_absolute() {
            chosen
        } else {
            base_dir.join(chosen)
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
