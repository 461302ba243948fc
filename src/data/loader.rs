use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader};

use super::model::ChannelImage;
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// File listing
// ---------------------------------------------------------------------------

/// List the names of files in `dir` ending with `extension` (case-sensitive).
///
/// Names are returned without the directory part, sorted, so that the same
/// folder always yields the same order. Hidden files are skipped, matching a
/// shell glob such as `*.TIF`.
pub fn list_images(dir: &Path, extension: &str) -> AnalysisResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(AnalysisError::NoSuchDirectory(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AnalysisError::io(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| AnalysisError::io(entry.path(), e))?;
        // follow symlinks the way a glob would
        let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            log::warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if name.starts_with('.') || !name.ends_with(extension) {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Channel decoding
// ---------------------------------------------------------------------------

/// Decode one image file into an 8-bit grayscale channel.
///
/// 16-bit samples are scaled by 1/256 and rounded. Colour images are reduced
/// to luma with BT.601 weights; alpha is dropped. The file is closed before
/// this function returns, on success and on failure.
pub fn load_channel(path: &Path) -> AnalysisResult<ChannelImage> {
    let decode_err = |source: ImageError| AnalysisError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    let (width, height) = (image.width(), image.height());
    if !matches!(image, DynamicImage::ImageLuma8(_)) {
        log::debug!(
            "{}: converting {:?} to 8-bit grayscale",
            path.display(),
            image.color()
        );
    }

    let pixels = match image {
        DynamicImage::ImageLuma8(buf) => buf.into_raw(),
        DynamicImage::ImageLuma16(buf) => buf.into_raw().into_iter().map(scale_16).collect(),
        DynamicImage::ImageLumaA8(buf) => buf.pixels().map(|p| p.0[0]).collect(),
        DynamicImage::ImageLumaA16(buf) => buf.pixels().map(|p| scale_16(p.0[0])).collect(),
        wide @ (DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgba16(_)) => wide
            .to_rgb16()
            .pixels()
            .map(|p| bt601_luma(p.0.map(|c| f64::from(c) / 256.0)))
            .collect(),
        other => other
            .to_rgb8()
            .pixels()
            .map(|p| bt601_luma(p.0.map(f64::from)))
            .collect(),
    };

    Ok(ChannelImage {
        width,
        height,
        pixels,
    })
}

/// 16-bit sample to 8-bit, rounded.
fn scale_16(value: u16) -> u8 {
    (f64::from(value) / 256.0).round().min(255.0) as u8
}

/// Luma of an RGB triple in the 0..=255 range, BT.601 weights.
fn bt601_luma([r, g, b]: [f64; 3]) -> u8 {
    (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
}
