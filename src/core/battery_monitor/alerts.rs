//! Threshold evaluation.
//!
//! Maps a battery reading and the configured thresholds to the alert condition
//! that currently holds. Evaluation is pure: it knows nothing about earlier
//! ticks, de-duplication happens in [`super::dedup`].

use serde::Serialize;

use super::reading::BatteryReading;
use crate::core::config::Thresholds;

/// Which rule is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AlertCondition {
    #[default]
    None,
    /// Below the low threshold and not charging
    Low,
    /// Above the high threshold and charging
    High,
}

/// A user-facing alert ready for the notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub condition: AlertCondition,
    pub title: String,
    pub body: String,
}

impl Alert {
    /// Alert text for a condition, `None` for [`AlertCondition::None`]
    pub fn for_condition(condition: AlertCondition, thresholds: &Thresholds) -> Option<Self> {
        let (title, body) = match condition {
            AlertCondition::None => return None,
            AlertCondition::Low => (
                "⚠️ Battery Low".to_string(),
                format!("Battery below {}%. Connect charger!", thresholds.low),
            ),
            AlertCondition::High => (
                "⚠️ Battery High".to_string(),
                format!("Battery above {}%. Unplug charger!", thresholds.high),
            ),
        };

        Some(Self {
            condition,
            title,
            body,
        })
    }
}

/// Evaluate a reading against thresholds. Equality with a threshold never triggers.
pub fn evaluate(reading: &BatteryReading, thresholds: &Thresholds) -> AlertCondition {
    let Some(level) = reading.level else {
        return AlertCondition::None;
    };

    if level < thresholds.low && !reading.is_charging {
        AlertCondition::Low
    } else if level > thresholds.high && reading.is_charging {
        AlertCondition::High
    } else {
        AlertCondition::None
    }
}
