//! `assets`
//!
//! Names, writes and tidies up the files that make up a favicon set.

use std::{
    io,
    path::{Path, PathBuf},
};

use image::{ImageFormat, RgbaImage};

/// File name of the ICO favicon.
pub const FAVICON_ICO: &str = "favicon.ico";
/// File name of the Apple touch icon.
pub const APPLE_TOUCH_ICON: &str = "apple-touch-icon.png";

/// Gets the file name of a square PNG favicon.
///
/// # Arguments
/// * `size`: Width and height of the favicon.
///
/// # Returns
/// A name of the form `favicon-48x48.png`.
pub fn png_file_name(size: u32) -> String {
    format!("favicon-{size}x{size}.png")
}

/// Writes an image as a PNG, replacing any existing file.
///
/// # Arguments
/// * `path`: Where to write the file.
/// * `image`: The image to write.
///
/// # Errors
/// If the image cannot be encoded or the file cannot be written.
pub fn write_png(path: &Path, image: &RgbaImage) -> Result<(), image::ImageError> {
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!(
        "Created {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(())
}

/// Removes the PNG favicons that are only needed while generating.
///
/// # Arguments
/// * `dir`: Directory holding the PNG favicons.
/// * `sizes`: Sizes of every PNG favicon that was generated.
/// * `keep`: The one size to leave in place.
///
/// # Returns
/// Paths of the files that were removed. Files already gone are skipped.
///
/// # Errors
/// If a file exists but cannot be removed.
pub fn cleanup_intermediates(dir: &Path, sizes: &[u32], keep: u32) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for size in sizes.iter().copied().filter(|size| *size != keep) {
        let path = dir.join(png_file_name(size));
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed {}", path.display());
                removed.push(path);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} already gone", path.display());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(removed)
}
