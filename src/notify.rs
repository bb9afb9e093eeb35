//! Desktop notification and clipboard output.

use anyhow::{Context, Result};
use notify_rust::{Notification, Timeout};
use std::time::Duration;

use crate::response::NotificationPayload;

const APP_NAME: &str = "Desktop GPT";

/// Shows a notification to the user.
pub trait Notifier {
    fn notify(&self, note: &NotificationPayload) -> Result<()>;
}

/// Replaces the clipboard contents.
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Notifications through the desktop notification service.
pub struct DesktopNotifier {
    /// Seconds the notification stays on screen
    pub timeout_secs: u32,
}

impl Notifier for DesktopNotifier {
    fn notify(&self, note: &NotificationPayload) -> Result<()> {
        let icon = crate::paths::get_icon_path(note.icon.as_str());
        crate::log(&format!("Notify: {} ({})", note.title, note.icon.as_str()));

        Notification::new()
            .appname(APP_NAME)
            .summary(&note.title)
            .body(&note.message)
            .icon(&icon.to_string_lossy())
            .timeout(Timeout::Milliseconds(self.timeout_secs.saturating_mul(1000)))
            .show()
            .context("Failed to show notification")?;
        Ok(())
    }
}

/// The OS clipboard.
pub struct SystemClipboard {
    /// How long the selection is served on Linux
    hold: Duration,
}

impl SystemClipboard {
    /// Serves the selection for `timeout_secs` (at least one second).
    pub fn new(timeout_secs: u32) -> Self {
        Self {
            hold: Duration::from_secs(u64::from(timeout_secs.max(1))),
        }
    }
}

impl ClipboardSink for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn write_text(&self, text: &str) -> Result<()> {
        use arboard::SetExtLinux;
        use std::time::Instant;

        // X11/Wayland clipboards are served by the owning process, so this
        // blocks until another application takes the selection or the hold ends.
        let mut clipboard = arboard::Clipboard::new().context("Failed to open clipboard")?;
        clipboard
            .set()
            .wait_until(Instant::now() + self.hold)
            .text(text)
            .context("Failed to write clipboard")?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Failed to open clipboard")?;
        clipboard.set_text(text).context("Failed to write clipboard")?;
        Ok(())
    }
}
