// Platform-specific code module

pub mod login_item;
pub mod notifier;

// Re-exports for cleaner imports
pub use login_item::{AutostartEntry, LoginItem};
pub use notifier::{DesktopNotifier, LogNotifier, Notifier};
