use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_RADIUS, DEFAULT_THREADS, MAX_RADIUS, SETTINGS_DIR_NAME,
    SETTINGS_FILE_NAME,
};
use crate::shared::error::BlurError;

/// Tunables for a blur run, loadable from a JSON settings file.
///
/// Missing fields fall back to their defaults, so a file containing only
/// `{"radius": 5}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSettings {
    pub radius: u32,
    pub progress_interval: usize,
    pub threads: usize,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            threads: DEFAULT_THREADS,
        }
    }
}

impl BlurSettings {
    /// `<config_dir>/boxblur/settings.json`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Reads and validates settings from an explicit JSON file.
    pub fn load(path: &Path) -> Result<Self, BlurError> {
        let json = fs::read_to_string(path).map_err(|e| {
            BlurError::config(format!("cannot read settings {}: {e}", path.display()))
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|e| {
            BlurError::config(format!("invalid settings {}: {e}", path.display()))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads from [`Self::default_path`], falling back to defaults when the
    /// file is absent. A present but unusable file is logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), BlurError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BlurError::io(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BlurError::config(format!("cannot serialize settings: {e}")))?;
        fs::write(path, json)
            .map_err(|e| BlurError::io(format!("cannot write {}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<(), BlurError> {
        if self.radius > MAX_RADIUS {
            return Err(BlurError::config(format!(
                "radius must be at most {MAX_RADIUS}, got {}",
                self.radius
            )));
        }
        if self.progress_interval == 0 {
            return Err(BlurError::config("progress interval must be at least 1"));
        }
        if self.threads == 0 {
            return Err(BlurError::config("thread count must be at least 1"));
        }
        Ok(())
    }
}
