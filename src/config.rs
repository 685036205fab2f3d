use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::GaitViewError;
use crate::export::DEFAULT_EXPORT_ROWS;
use crate::motion::{DEFAULT_PLOT_TICK_STEP_S, DEFAULT_PLOT_WINDOW_S};
use crate::playback::{DEFAULT_TICK_PERIOD_MS, battery::FULL_BATTERY, fault::DEFAULT_FAULT_THRESHOLD};

const CONFIG_DIR_NAME: &str = "gaitview";
const CONFIG_FILE_NAME: &str = "config.json";
const ANIMATION_INTERVAL_MS: u64 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Period of the playback tick, which also drains the battery.
    pub tick_period_ms: u64,
    /// Repaint cadence of the simulation view while playing.
    pub animation_interval_ms: u64,
    pub initial_battery: u8,
    pub fault_threshold: f64,
    pub plot_window_s: f64,
    pub plot_tick_step_s: f64,
    pub export_rows: usize,
    pub last_joint_file: Option<PathBuf>,
    pub last_motion_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            animation_interval_ms: ANIMATION_INTERVAL_MS,
            initial_battery: FULL_BATTERY,
            fault_threshold: DEFAULT_FAULT_THRESHOLD,
            plot_window_s: DEFAULT_PLOT_WINDOW_S,
            plot_tick_step_s: DEFAULT_PLOT_TICK_STEP_S,
            export_rows: DEFAULT_EXPORT_ROWS,
            last_joint_file: None,
            last_motion_file: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads the per-user config file. Missing or unreadable files yield `None` so the
    /// caller can fall back to defaults.
    pub fn from_local_file() -> Option<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }
        match Self::load_from(&config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring config file {:?}: {}", config_path, e);
                None
            }
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self, GaitViewError> {
        let file = std::fs::File::open(config_path)
            .map_err(|e| GaitViewError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| GaitViewError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), GaitViewError> {
        let config_path = Self::config_path().ok_or(GaitViewError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), GaitViewError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| GaitViewError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| GaitViewError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| GaitViewError::ConfigSerializeError { source: e })
    }
}
