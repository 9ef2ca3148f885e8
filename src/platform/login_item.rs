//! Launch-at-login registration.
//!
//! Each platform has a per-user autostart location that the OS scans at
//! login. Registering the agent means writing one file there; unregistering
//! means removing it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BattError, Result};

/// Label used for the macOS LaunchAgent and file names elsewhere
pub const LOGIN_ITEM_LABEL: &str = "com.battalert.agent";

/// OS facility that starts the agent when the user logs in
pub trait LoginItem: Send + Sync {
    fn is_enabled(&self) -> Result<bool>;
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

/// A login item backed by a single file in an autostart directory
#[derive(Debug, Clone)]
pub struct AutostartEntry {
    path: PathBuf,
    contents: String,
}

impl AutostartEntry {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Entry that launches the running executable with `run` at login
    pub fn for_current_platform() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let (path, contents) = platform_entry(&exe)?;
        Ok(Self::new(path, contents))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LoginItem for AutostartEntry {
    fn is_enabled(&self) -> Result<bool> {
        Ok(self.path.is_file())
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        if enabled {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    BattError::login_item(format!("Failed to create {:?}: {}", parent, e))
                })?;
            }
            fs::write(&self.path, &self.contents).map_err(|e| {
                BattError::login_item(format!("Failed to write {:?}: {}", self.path, e))
            })?;
            log::info!("Registered login item at {:?}", self.path);
        } else if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                BattError::login_item(format!("Failed to remove {:?}: {}", self.path, e))
            })?;
            log::info!("Removed login item at {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn platform_entry(exe: &Path) -> Result<(PathBuf, String)> {
    let home = dirs::home_dir()
        .ok_or_else(|| BattError::login_item("Could not determine home directory"))?;
    let path = home
        .join("Library")
        .join("LaunchAgents")
        .join(format!("{}.plist", LOGIN_ITEM_LABEL));

    let contents = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{label}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
        <string>run</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        label = LOGIN_ITEM_LABEL,
        exe = xml_escape(&exe.to_string_lossy()),
    );

    Ok((path, contents))
}

#[cfg(windows)]
fn platform_entry(exe: &Path) -> Result<(PathBuf, String)> {
    let roaming = dirs::data_dir()
        .ok_or_else(|| BattError::login_item("Could not determine AppData directory"))?;
    let path = roaming
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
        .join("Startup")
        .join("battalert.cmd");

    let contents = format!(
        "@echo off\r\nstart \"\" /min \"{}\" run\r\n",
        exe.display()
    );

    Ok((path, contents))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_entry(exe: &Path) -> Result<(PathBuf, String)> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| BattError::login_item("Could not determine config directory"))?;
    let path = config_dir.join("autostart").join("battalert.desktop");

    let contents = format!(
        "[Desktop Entry]\nType=Application\nName=battalert\nComment=Battery threshold alerts\nExec=\"{}\" run\nX-GNOME-Autostart-enabled=true\nNoDisplay=true\n",
        exe.display()
    );

    Ok((path, contents))
}

#[cfg(not(any(unix, windows)))]
fn platform_entry(_exe: &Path) -> Result<(PathBuf, String)> {
    Err(BattError::login_item(
        "Launch at login is not supported on this platform",
    ))
}

#[cfg(target_os = "macos")]
fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
