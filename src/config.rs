use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Dispatch tunables.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct JoySettings {
    /// Normalized axis magnitudes at or below this are forced to 0.0.
    pub deadzone: f32,

    /// Publishes per second of the unchanged state while input is silent.
    /// 0.0 disables autorepeat.
    pub autorepeat_rate: f64,

    /// Seconds within which repeated reports of the same axis are merged
    /// into one publish.
    pub coalesce_interval: f64,
}

impl Default for JoySettings {
    fn default() -> Self {
        Self {
            deadzone: 0.05,
            autorepeat_rate: 0.0,
            coalesce_interval: 0.001,
        }
    }
}

/// Broker connection and topic for the outgoing joy state.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub topic: String,
    pub client_id: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            topic: "joy".to_string(),
            client_id: "joybridge".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Settings {
    pub joy: JoySettings,
    pub mqtt: MqttConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("joybridge").join("config.toml"))
}

/// Load settings from the user config directory, falling back to defaults
/// when no file exists. A file that exists but cannot be read or parsed is
/// an error; silently running with defaults over a typo would be worse.
pub fn load() -> Result<Settings, SettingsError> {
    let Some(path) = settings_path() else {
        info!("No config directory on this system, using default settings");
        return Ok(Settings::default());
    };

    if !path.exists() {
        info!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(&path)?;
    let settings: Settings = toml::from_str(&raw)?;
    info!("Loaded settings from {}", path.display());
    Ok(settings)
}
