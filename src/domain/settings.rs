use crate::infrastructure::tracker::protocol::{DEFAULT_DEVICE_NAME, DEFAULT_STREAM_RATE_HZ};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Console output plus an optional rolling log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` overrides it
    pub level: String,
    pub console: bool,
    /// `null` turns file logging off
    pub file: Option<LogFileSettings>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: Some(LogFileSettings::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFileSettings {
    pub dir: PathBuf,
    pub prefix: String,
    pub rotation: LogRotation,
}

impl Default for LogFileSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            prefix: "eye_tracker_bridge".to_string(),
            rotation: LogRotation::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Daily,
    Hourly,
    Minutely,
    Never,
}

/// Timing of the synthetic device the binary runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_blink_interval_ms")]
    pub blink_interval_ms: u64,
    #[serde(default = "default_eye_close_interval_ms")]
    pub eye_close_interval_ms: u64,
    #[serde(default = "default_eye_close_duration_ms")]
    pub eye_close_duration_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            blink_interval_ms: default_blink_interval_ms(),
            eye_close_interval_ms: default_eye_close_interval_ms(),
            eye_close_duration_ms: default_eye_close_duration_ms(),
        }
    }
}

fn default_blink_interval_ms() -> u64 {
    4000
}
fn default_eye_close_interval_ms() -> u64 {
    15000
}
fn default_eye_close_duration_ms() -> u64 {
    1200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_device_name")]
    pub device_name: String,
    #[serde(default = "default_stream_rate_hz")]
    pub stream_rate_hz: f32,

    // Records go to this file as JSON lines; logged at debug level otherwise
    #[serde(default)]
    pub record_output: Option<String>,

    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            stream_rate_hz: default_stream_rate_hz(),
            record_output: None,
            simulation: SimulationSettings::default(),
            log_settings: LogSettings::default(),
        }
    }
}

fn default_device_name() -> String {
    DEFAULT_DEVICE_NAME.to_string()
}
fn default_stream_rate_hz() -> f32 {
    DEFAULT_STREAM_RATE_HZ
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::with_path(settings_path))
    }

    /// Load settings from an explicit file, falling back to defaults.
    pub fn with_path(settings_path: PathBuf) -> Self {
        let settings = Self::load_from_file(&settings_path).unwrap_or_default();
        Self {
            settings,
            settings_path,
        }
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("EyeTrackerBridge");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}
