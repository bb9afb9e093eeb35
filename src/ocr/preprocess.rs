use image::{DynamicImage, GrayImage};

/// Brightness below which the sampled band counts as a dark background.
const DARK_BACKGROUND_THRESHOLD: f64 = 128.0;

/// Converts a capture to grayscale with dark text on a light background.
///
/// The top 10% of rows is sampled; if its mean brightness is below 128 the
/// capture is assumed to be light-on-dark (terminals, dark themes) and is
/// inverted. Captures shorter than 10 rows are left as they are.
pub fn normalize_polarity(img: &DynamicImage) -> GrayImage {
    let mut gray = img.to_luma8();

    if let Some(mean) = top_band_mean(&gray) {
        if mean < DARK_BACKGROUND_THRESHOLD {
            crate::log(&format!("Dark background (mean {:.1}), inverting", mean));
            image::imageops::invert(&mut gray);
        }
    }

    gray
}

/// Mean brightness of the top tenth of rows, or `None` if that band is empty.
fn top_band_mean(gray: &GrayImage) -> Option<f64> {
    let (width, height) = gray.dimensions();
    let band_rows = height / 10;
    if band_rows == 0 || width == 0 {
        return None;
    }

    let band_len = (width * band_rows) as usize;
    let sum: u64 = gray.as_raw()[..band_len].iter().map(|&v| v as u64).sum();
    Some(sum as f64 / band_len as f64)
}
