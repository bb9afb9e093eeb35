pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::recognize_text;
pub use preprocess::normalize_polarity;

use anyhow::{Context, Result};
use std::path::Path;

/// High-level function: screenshot file → recognized text.
///
/// Loads the image, normalizes it to dark-on-light grayscale and runs
/// Tesseract over the whole capture.
pub fn read_text_from_image(path: &Path) -> Result<String> {
    crate::log(&format!("OCR: loading {}", path.display()));

    let img = image::open(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let preprocessed = normalize_polarity(&img);
    let text = recognize_text(&preprocessed)?;

    crate::log(&format!("OCR: recognized {} characters", text.chars().count()));
    Ok(text)
}
