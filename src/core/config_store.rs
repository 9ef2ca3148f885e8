//! Shared access to the persisted thresholds and the login item flag.
//!
//! The poll loop reads thresholds on every tick while the settings surface may
//! write them at any time. Both stores keep the pair behind a single lock, so a
//! reader sees either the old pair or the new one.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use super::config::{Config, Thresholds};
use crate::error::{BattError, Result};
use crate::platform::login_item::{AutostartEntry, LoginItem};

pub trait ConfigStore: Send + Sync {
    /// Current thresholds
    fn thresholds(&self) -> Thresholds;

    /// Validate and persist a new pair. On error the previous pair stays in effect.
    fn set_thresholds(&self, thresholds: Thresholds) -> Result<()>;

    fn login_item(&self) -> bool;

    fn set_login_item(&self, enabled: bool) -> Result<()>;
}

/// Identifies one version of the config file on disk
type FileStamp = Option<(SystemTime, u64)>;

fn file_stamp(path: &Path) -> FileStamp {
    let metadata = fs::metadata(path).ok()?;
    Some((metadata.modified().ok()?, metadata.len()))
}

struct StoreState {
    config: Config,
    stamp: FileStamp,
}

/// Store backed by the JSON config file.
///
/// Changes written by another process (for example `battalert set thresholds`
/// while an agent is running) are picked up on the next read.
pub struct JsonConfigStore {
    path: PathBuf,
    state: RwLock<StoreState>,
    login_item: Box<dyn LoginItem>,
}

impl JsonConfigStore {
    pub fn open(path: impl Into<PathBuf>, login_item: Box<dyn LoginItem>) -> anyhow::Result<Self> {
        let path = path.into();
        let stamp = file_stamp(&path);
        let config = Config::load_from(&path)?;

        Ok(Self {
            path,
            state: RwLock::new(StoreState { config, stamp }),
            login_item,
        })
    }

    /// Store at the default config location with the platform login item
    pub fn open_default() -> anyhow::Result<Self> {
        let path = Config::get_config_path()?;
        let login_item = AutostartEntry::for_current_platform()?;
        Self::open(path, Box::new(login_item))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the whole config
    pub fn config(&self) -> Config {
        self.refresh_if_changed();
        self.state.read().config.clone()
    }

    fn refresh_if_changed(&self) {
        let stamp = file_stamp(&self.path);
        if stamp == self.state.read().stamp {
            return;
        }

        match Config::load_from(&self.path) {
            Ok(config) => {
                let mut state = self.state.write();
                if state.config != config {
                    log::info!("Reloaded configuration from {:?}", self.path);
                }
                state.config = config;
                state.stamp = stamp;
            }
            Err(e) => log::warn!("Keeping previous configuration: {:#}", e),
        }
    }
}

impl ConfigStore for JsonConfigStore {
    fn thresholds(&self) -> Thresholds {
        self.refresh_if_changed();
        self.state.read().config.thresholds()
    }

    fn set_thresholds(&self, thresholds: Thresholds) -> Result<()> {
        thresholds.validate()?;
        self.refresh_if_changed();

        let mut state = self.state.write();
        let mut updated = state.config.clone();
        updated.set_thresholds(thresholds);
        updated
            .save_to(&self.path)
            .map_err(|e| BattError::config(format!("{:#}", e)))?;

        state.config = updated;
        state.stamp = file_stamp(&self.path);
        log::info!(
            "Thresholds set to low {}%, high {}%",
            thresholds.low,
            thresholds.high
        );
        Ok(())
    }

    fn login_item(&self) -> bool {
        self.login_item.is_enabled().unwrap_or_else(|e| {
            log::warn!("Could not read login item state: {}", e);
            false
        })
    }

    fn set_login_item(&self, enabled: bool) -> Result<()> {
        self.login_item.set_enabled(enabled)
    }
}

/// In-process store for embedding and tests; nothing is persisted
#[derive(Default)]
pub struct MemoryConfigStore {
    thresholds: RwLock<Thresholds>,
    login_item: AtomicBool,
}

impl MemoryConfigStore {
    pub fn new(thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            thresholds: RwLock::new(thresholds),
            login_item: AtomicBool::new(false),
        })
    }
}

impl ConfigStore for MemoryConfigStore {
    fn thresholds(&self) -> Thresholds {
        *self.thresholds.read()
    }

    fn set_thresholds(&self, thresholds: Thresholds) -> Result<()> {
        thresholds.validate()?;
        *self.thresholds.write() = thresholds;
        Ok(())
    }

    fn login_item(&self) -> bool {
        self.login_item.load(Ordering::SeqCst)
    }

    fn set_login_item(&self, enabled: bool) -> Result<()> {
        self.login_item.store(enabled, Ordering::SeqCst);
        Ok(())
    }
}
