use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ValidationError;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "BATTALERT_CONFIG";

pub const DEFAULT_LOW_THRESHOLD: u8 = 22;
pub const DEFAULT_HIGH_THRESHOLD: u8 = 78;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Low/high charge thresholds in percent.
///
/// A valid pair satisfies `low < high <= 100`. The fields are public so a
/// settings surface can build a candidate pair; stores call
/// [`Thresholds::validate`] before accepting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: u8,
    pub high: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Build a validated pair
    pub fn new(low: u8, high: u8) -> std::result::Result<Self, ValidationError> {
        let thresholds = Self { low, high };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.high > 100 {
            return Err(ValidationError::HighAboveHundred(self.high));
        }
        if self.low >= self.high {
            return Err(ValidationError::LowNotBelowHigh {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// How the battery probe is invoked and how its output is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Executable to run (looked up in PATH)
    pub program: String,
    pub args: Vec<String>,
    /// Substring of the probe output meaning external power is connected
    pub charging_marker: String,
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let (program, args, charging_marker) = platform_probe();
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            charging_marker: charging_marker.to_string(),
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(target_os = "macos")]
fn platform_probe() -> (&'static str, &'static [&'static str], &'static str) {
    // "Now drawing from 'AC Power'" / "Now drawing from 'Battery Power'"
    ("pmset", &["-g", "batt"], "AC Power")
}

#[cfg(windows)]
fn platform_probe() -> (&'static str, &'static [&'static str], &'static str) {
    // BatteryStatus 2 means the system has access to AC power
    (
        "powershell",
        &[
            "-NoProfile",
            "-Command",
            "Get-CimInstance Win32_Battery | ForEach-Object { \"$($_.EstimatedChargeRemaining)% status=$($_.BatteryStatus)\" }",
        ],
        "status=2",
    )
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_probe() -> (&'static str, &'static [&'static str], &'static str) {
    // "Battery 0: Discharging, 85%, ..." followed by "Adapter 0: on-line"
    ("acpi", &["-b", "-a"], "on-line")
}

fn default_low_threshold() -> u8 {
    DEFAULT_LOW_THRESHOLD
}

fn default_high_threshold() -> u8 {
    DEFAULT_HIGH_THRESHOLD
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_low_threshold")]
    pub low_threshold: u8,
    #[serde(default = "default_high_threshold")]
    pub high_threshold: u8,
    /// Seconds between two battery samples
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            probe: ProbeConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Config::default());
        }

        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!(
                "Ignoring unreadable config file {:?} ({}), using defaults",
                config_path,
                e
            );
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Write the config next to its final location, then rename it into place
    /// so readers never see a partially written file.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data =
            serde_json::to_vec_pretty(self).with_context(|| "Failed to serialize config")?;

        let tmp_path = config_path.with_extension("json.tmp");
        fs::write(&tmp_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", tmp_path))?;
        fs::rename(&tmp_path, config_path)
            .with_context(|| format!("Failed to replace config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("battalert").join("config.json"))
    }

    /// Thresholds stored in this config, or the defaults when the stored pair is invalid
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.low_threshold, self.high_threshold).unwrap_or_else(|e| {
            log::warn!("Stored thresholds rejected ({}), using defaults", e);
            Thresholds::default()
        })
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.low_threshold = thresholds.low;
        self.high_threshold = thresholds.high;
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
