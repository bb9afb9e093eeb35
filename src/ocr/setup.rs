use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::process::Command;

/// Common install locations checked when `tesseract` is not on PATH.
const COMMON_PATHS: [&str; 3] = [
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// Returns the per-user directory for a bundled Tesseract.
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("desktop-gpt")
        .join("tesseract")
}

/// Finds the Tesseract executable, checking our local dir first, then system
pub fn find_tesseract_executable() -> Result<PathBuf> {
    let local_exe = get_tesseract_dir().join("tesseract");
    if local_exe.exists() {
        return Ok(local_exe);
    }

    // Check PATH
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    COMMON_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("Tesseract not found. Please install tesseract-ocr."))
}

/// Finds a tessdata directory holding `<language>.traineddata`.
///
/// Returns `None` when Tesseract should fall back to its compiled-in default.
pub fn find_tessdata_dir(language: &str) -> Option<PathBuf> {
    let traineddata = format!("{}.traineddata", language);

    let local_tessdata = get_tesseract_dir().join("tessdata");
    if local_tessdata.join(&traineddata).exists() {
        return Some(local_tessdata);
    }

    // TESSDATA_PREFIX may point at tessdata itself or at its parent
    let prefix = PathBuf::from(std::env::var_os("TESSDATA_PREFIX")?);
    [prefix.clone(), prefix.join("tessdata")]
        .into_iter()
        .find(|p| p.join(&traineddata).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tesseract_dir_is_app_scoped() {
        let dir = get_tesseract_dir();
        assert!(dir.ends_with("desktop-gpt/tesseract"));
    }

    #[test]
    fn test_unknown_language_has_no_tessdata() {
        assert!(find_tessdata_dir("definitely-not-a-language").is_none());
    }
}
