use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the notification icon directory: `<exe_dir>/img/`
pub fn get_icons_dir() -> PathBuf {
    get_exe_dir().join("img")
}

/// Returns the icon file for a notification icon identifier.
pub fn get_icon_path(icon: &str) -> PathBuf {
    get_icons_dir().join(format!("{}.png", icon))
}

/// Returns the per-user config file: `<config_dir>/desktop-gpt/config.json`
pub fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("desktop-gpt").join("config.json"))
}

/// Returns the fixed path the screenshot tool writes to.
pub fn get_screenshot_path() -> PathBuf {
    std::env::temp_dir().join("screenshot.png")
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_path_uses_png_in_img_dir() {
        let path = get_icon_path("error");
        assert_eq!(path.file_name().unwrap(), "error.png");
        assert!(path.parent().unwrap().ends_with("img"));
    }

    #[test]
    fn test_screenshot_path_is_fixed() {
        assert_eq!(get_screenshot_path(), get_screenshot_path());
        assert_eq!(get_screenshot_path().file_name().unwrap(), "screenshot.png");
    }
}
