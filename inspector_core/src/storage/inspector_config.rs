// inspector_core/src/storage/inspector_config.rs
use crate::constants::*;
use crate::error::{InspectorError, Result};
use crate::{inspector_error, inspector_info};
use directories_next::ProjectDirs;
use once_cell::sync::Lazy;
use ron::ser::{to_string_pretty, PrettyConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

pub static INSPECTOR_SETTINGS: Lazy<RwLock<InspectorSettings>> = Lazy::new(|| RwLock::new(load_settings()));

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorSettings {
    /// Name of the serializer used for records.
    pub serializer: String,
    /// Create null nested objects when restoring an empty record.
    pub auto_instantiate_references: bool,
    pub max_instantiation_depth: usize,
    /// Log every metadata entry evicted at the end of a cull zone.
    pub log_metadata_evictions: bool,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            serializer: DEFAULT_SERIALIZER.to_string(),
            auto_instantiate_references: false,
            max_instantiation_depth: DEFAULT_MAX_INSTANTIATION_DEPTH,
            log_metadata_evictions: false,
        }
    }
}

/// Returns a copy of the in memory settings.
pub fn current_settings() -> InspectorSettings {
    INSPECTOR_SETTINGS.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Replaces the in memory settings. Call `save_settings` to persist them.
pub fn set_settings(settings: InspectorSettings) {
    *INSPECTOR_SETTINGS.write().unwrap_or_else(PoisonError::into_inner) = settings;
}

/// Saves the in memory settings to the app dir.
pub fn save_settings() -> Result<()> {
    let path = settings_path().ok_or_else(unresolved_app_dir)?;
    save_settings_to(&path, &current_settings())
}

/// Writes `settings` as a .ron file, creating parent directories.
pub fn save_settings_to(path: &Path, settings: &InspectorSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let ron = to_string_pretty(settings, PrettyConfig::default())
        .map_err(|e| InspectorError::Serialize(e.to_string()))?;
    fs::write(path, ron)?;
    Ok(())
}

pub fn load_settings_from(path: &Path) -> Result<InspectorSettings> {
    let txt = fs::read_to_string(path)?;
    ron::from_str(&txt).map_err(|e| InspectorError::Deserialize(e.to_string()))
}

/// Returns the config directory of the inspector, if the platform has one.
pub fn app_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "inspector", "inspector_core").map(|dirs| dirs.config_dir().to_path_buf())
}

fn settings_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(SETTINGS_RON))
}

fn unresolved_app_dir() -> InspectorError {
    InspectorError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "could not resolve app directory",
    ))
}

fn load_settings() -> InspectorSettings {
    let Some(path) = settings_path() else {
        inspector_error!("Could not resolve app directory.");
        return InspectorSettings::default();
    };
    if !path.exists() {
        return InspectorSettings::default();
    }

    match load_settings_from(&path) {
        Ok(settings) => {
            inspector_info!("Loaded settings from {}.", path.display());
            settings
        }
        Err(e) => {
            inspector_error!("Error loading settings: {e}.");
            InspectorSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn settings_survive_a_save_and_load() {
        let path = std::env::temp_dir()
            .join(Uuid::new_v4().to_string())
            .join(SETTINGS_RON);
        let settings = InspectorSettings {
            serializer: "ron".into(),
            auto_instantiate_references: true,
            max_instantiation_depth: 3,
            log_metadata_evictions: true,
        };

        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), settings);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: InspectorSettings = ron::from_str("(serializer: \"ron\")").unwrap();
        assert_eq!(settings.serializer, "ron");
        assert_eq!(settings.max_instantiation_depth, DEFAULT_MAX_INSTANTIATION_DEPTH);
        assert!(!settings.auto_instantiate_references);
    }
}
