//! Screenshot capture through the desktop's own selection tool.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;

use crate::desktop::Desktop;

/// Builds the command that lets the user select a region and writes it to
/// `output` as PNG.
///
/// - Plasma: `spectacle -rbno <output>` (region, background, no notification)
/// - Other: `gnome-screenshot -af <output>` (area, file)
pub fn screenshot_command(desktop: Desktop, output: &Path) -> Command {
    let mut cmd = match desktop {
        Desktop::Plasma => {
            let mut cmd = Command::new("spectacle");
            cmd.arg("-rbno");
            cmd
        }
        Desktop::Other => {
            let mut cmd = Command::new("gnome-screenshot");
            cmd.arg("-af");
            cmd
        }
    };
    cmd.arg(output);
    cmd
}

/// Lets the user select a screen region and saves it to `output`.
///
/// Blocks until the tool exits. A stale file from an earlier run is removed
/// first so a cancelled selection is not mistaken for a new capture.
pub fn capture_region(desktop: Desktop, output: &Path) -> Result<()> {
    crate::log("Starting capture...");

    if output.exists() {
        std::fs::remove_file(output)
            .with_context(|| format!("Failed to remove old screenshot {}", output.display()))?;
    }

    let mut cmd = screenshot_command(desktop, output);
    let program = cmd.get_program().to_string_lossy().to_string();
    let status = cmd
        .status()
        .with_context(|| format!("Failed to launch {}", program))?;

    if !status.success() {
        return Err(anyhow!("{} exited with {}", program, status));
    }
    if !output.exists() {
        return Err(anyhow!("No screenshot written (selection cancelled?)"));
    }

    crate::log(&format!("Saved to {}", output.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn test_plasma_uses_spectacle() {
        let cmd = screenshot_command(Desktop::Plasma, Path::new("/tmp/screenshot.png"));
        assert_eq!(cmd.get_program(), "spectacle");
        assert_eq!(args(&cmd), vec!["-rbno", "/tmp/screenshot.png"]);
    }

    #[test]
    fn test_other_uses_gnome_screenshot() {
        let cmd = screenshot_command(Desktop::Other, Path::new("/tmp/screenshot.png"));
        assert_eq!(cmd.get_program(), "gnome-screenshot");
        assert_eq!(args(&cmd), vec!["-af", "/tmp/screenshot.png"]);
    }
}
