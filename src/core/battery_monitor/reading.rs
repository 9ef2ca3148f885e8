//! Battery readings and probe output parsing.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static LEVEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)%").expect("level pattern is valid"));

/// One battery sample, created fresh on every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatteryReading {
    /// Charge in percent, `None` when the probe output held no usable percentage
    pub level: Option<u8>,
    /// External power is connected
    pub is_charging: bool,
    pub sampled_at: DateTime<Utc>,
}

impl BatteryReading {
    pub fn new(level: Option<u8>, is_charging: bool) -> Self {
        Self {
            level,
            is_charging,
            sampled_at: Utc::now(),
        }
    }

    /// Parse raw probe output. Never fails; missing data yields `level: None`.
    pub fn parse(raw: &str, charging_marker: &str) -> Self {
        Self::new(parse_level(raw), parse_charging(raw, charging_marker))
    }
}

/// First integer immediately followed by `%`. Values above 100 are not a level.
pub fn parse_level(raw: &str) -> Option<u8> {
    LEVEL_PATTERN
        .captures(raw)
        .and_then(|caps| caps[1].parse::<u8>().ok())
        .filter(|level| *level <= 100)
}

pub fn parse_charging(raw: &str, charging_marker: &str) -> bool {
    !charging_marker.is_empty() && raw.contains(charging_marker)
}
