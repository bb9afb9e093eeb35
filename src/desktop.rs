//! Desktop environment detection.
//!
//! Read once at startup from `DESKTOP_SESSION`; the rest of the program only
//! sees the capability flags.

/// The two desktop environments the tool knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desktop {
    /// KDE Plasma: spectacle for capture, rich text in notification bodies
    Plasma,
    /// GNOME and anything else: gnome-screenshot, plain-text notifications
    Other,
}

impl Desktop {
    /// Detects the desktop from the current process environment.
    pub fn detect() -> Self {
        let session = std::env::var("DESKTOP_SESSION").ok();
        let desktop = Self::from_session(session.as_deref());
        crate::log(&format!(
            "Desktop session {:?} -> {:?}",
            session.as_deref().unwrap_or(""),
            desktop
        ));
        desktop
    }

    /// Maps a `DESKTOP_SESSION` value to a desktop.
    pub fn from_session(session: Option<&str>) -> Self {
        match session {
            Some(s) if s.to_ascii_lowercase().contains("plasma") => Desktop::Plasma,
            _ => Desktop::Other,
        }
    }

    /// Whether notification bodies may contain hyperlinks.
    pub fn supports_rich_notifications(self) -> bool {
        matches!(self, Desktop::Plasma)
    }
}
