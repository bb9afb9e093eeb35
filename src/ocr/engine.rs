use anyhow::{anyhow, Result};
use image::GrayImage;
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{find_tessdata_dir, find_tesseract_executable};

const LANGUAGE: &str = "eng";

/// Runs Tesseract on a preprocessed grayscale image and returns its text.
///
/// Uses the default engine (`--oem 3`) and treats the capture as a single
/// uniform block of text (`--psm 6`).
pub fn recognize_text(img: &GrayImage) -> Result<String> {
    let tesseract_exe = find_tesseract_executable()?;

    // Save image to temporary file
    let temp_input = NamedTempFile::with_suffix(".png")?;
    img.save(temp_input.path())?;

    let mut cmd = Command::new(&tesseract_exe);
    cmd.arg(temp_input.path()).arg("stdout");
    if let Some(tessdata_dir) = find_tessdata_dir(LANGUAGE) {
        cmd.arg("--tessdata-dir").arg(tessdata_dir);
    }
    let output = cmd
        .arg("-l")
        .arg(LANGUAGE)
        .arg("--oem")
        .arg("3")
        .arg("--psm")
        .arg("6")
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("Tesseract failed: {}", stderr));
    }

    Ok(drop_last_char(String::from_utf8_lossy(&output.stdout).to_string()))
}

/// Drops the final character of Tesseract output.
///
/// Tesseract ends stdout output with a form feed page separator, which is what
/// this removes in practice. It is dropped unconditionally, so output that
/// does not end that way loses a real character.
pub fn drop_last_char(mut text: String) -> String {
    text.pop();
    text
}
