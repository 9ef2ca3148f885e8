// Core business logic module

pub mod battery_monitor;
pub mod config;
pub mod config_store;

// Re-export commonly used items
pub use config::{Config, ProbeConfig, Thresholds};
pub use config_store::{ConfigStore, JsonConfigStore, MemoryConfigStore};
