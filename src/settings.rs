use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_calendar_path")]
    pub calendar_path: String,
    #[serde(default = "default_recurrence_threshold")]
    pub recurrence_threshold: f64,
    #[serde(default = "default_forward_weekends")]
    pub forward_weekends: bool,
    #[serde(default = "default_html_target")]
    pub html_target: String,
}

fn default_calendar_path() -> String {
    "calendar.json".to_string()
}

fn default_recurrence_threshold() -> f64 {
    crate::recurrence::DEFAULT_THRESHOLD
}

fn default_forward_weekends() -> bool {
    true
}

fn default_html_target() -> String {
    "calendar-root".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calendar_path: default_calendar_path(),
            recurrence_threshold: default_recurrence_threshold(),
            forward_weekends: default_forward_weekends(),
            html_target: default_html_target(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("cadence")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring invalid {}: {e}", path.display());
                Settings::default()
            }
        }
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CadenceError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

/// Resolve the calendar document path: an explicit `--file` wins over settings.
pub fn calendar_path(file: Option<String>) -> PathBuf {
    match file {
        Some(f) => PathBuf::from(shellexpand_path(&f)),
        None => PathBuf::from(shellexpand_path(&load_settings().calendar_path)),
    }
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            calendar_path: "/tmp/cal.json".to_string(),
            recurrence_threshold: 0.6,
            forward_weekends: false,
            html_target: "root".to_string(),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.calendar_path, "/tmp/cal.json");
        assert_eq!(loaded.recurrence_threshold, 0.6);
        assert!(!loaded.forward_weekends);
        assert_eq!(loaded.html_target, "root");
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.calendar_path, "calendar.json");
        assert_eq!(s.recurrence_threshold, 0.75);
        assert!(s.forward_weekends);
        assert_eq!(s.html_target, "calendar-root");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"calendar_path": "data/cal.json"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.calendar_path, "data/cal.json");
        assert_eq!(s.recurrence_threshold, 0.75);
        assert!(s.forward_weekends);
    }

    #[test]
    fn test_explicit_file_wins() {
        let p = calendar_path(Some("other.json".to_string()));
        assert_eq!(p, PathBuf::from("other.json"));
    }
}
