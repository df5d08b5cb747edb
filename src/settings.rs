use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::scene::WORLD_MESH_ATTRIBUTE;

const SETTINGS_DIR: &str = "ncloth-pervertex";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Undoable commands kept by the undo queue. 0 disables recording.
    pub undo_queue_depth: usize,
    /// Array plug on shapes that feeds simulation nodes
    pub output_mesh_attribute: String,
    /// `env_logger` filter string, e.g. "info" or "ncloth_pervertex_lib=debug"
    pub log_level: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            undo_queue_depth: 50,
            output_mesh_attribute: WORLD_MESH_ATTRIBUTE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl PluginSettings {
    /// Update one setting by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "undo_queue_depth" => {
                self.undo_queue_depth = value
                    .parse()
                    .map_err(|_| format!("Invalid undo_queue_depth: {}", value))?;
            }
            "output_mesh_attribute" if !value.is_empty() => {
                self.output_mesh_attribute = value.to_string();
            }
            "log_level" if !value.is_empty() => {
                self.log_level = value.to_string();
            }
            "output_mesh_attribute" | "log_level" => {
                return Err(format!("{} must not be empty", key));
            }
            _ => return Err(format!("Unknown setting: {}", key)),
        }
        Ok(())
    }
}

/// `<config dir>/ncloth-pervertex/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Read settings from a JSON file. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<PluginSettings, String> {
    if !path.exists() {
        return Ok(PluginSettings::default());
    }
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read settings {}: {}", path.display(), e))?;
    serde_json::from_str(&json)
        .map_err(|e| format!("Failed to parse settings {}: {}", path.display(), e))
}

pub fn save_settings(path: &Path, settings: &PluginSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    std::fs::write(path, json)
        .map_err(|e| format!("Failed to write settings {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_validates_keys_and_values() {
        let mut settings = PluginSettings::default();
        settings.set("undo_queue_depth", "3").unwrap();
        assert_eq!(settings.undo_queue_depth, 3);

        assert!(settings.set("undo_queue_depth", "-1").is_err());
        assert!(settings.set("log_level", "").is_err());
        assert!(settings.set("colour", "red").is_err());
    }

    #[test]
    fn save_then_load_and_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        assert_eq!(load_settings(&path).unwrap(), PluginSettings::default());

        let mut settings = PluginSettings::default();
        settings.undo_queue_depth = 7;
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);

        std::fs::write(&path, r#"{"log_level": "debug"}"#).unwrap();
        let partial = load_settings(&path).unwrap();
        assert_eq!(partial.log_level, "debug");
        assert_eq!(partial.undo_queue_depth, 50);
    }
}
