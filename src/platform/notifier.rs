//! Delivery of alerts to the host's notification facility.

use notify_rust::Notification;
#[cfg(all(unix, not(target_os = "macos")))]
use notify_rust::Urgency;

use crate::error::NotifyError;

/// Delivers one alert. Implementations return once the notification has been
/// handed to the OS; they never wait for the user to dismiss it.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop notifications through `notify-rust`
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self {
            app_name: "battalert".to_string(),
        }
    }
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let mut notification = Notification::new();
        notification.summary(title).body(body).appname(&self.app_name);

        #[cfg(target_os = "macos")]
        notification.sound_name("Ping");

        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(Urgency::Critical);

        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Backend(e.to_string()))
    }
}

/// Writes alerts to the log instead of the desktop (headless hosts, `--no-notify`)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        log::warn!("{} {}", title, body);
        Ok(())
    }
}
