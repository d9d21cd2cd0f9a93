//! `optimized`
//!
//! The optimized favicon set: PNG favicons at several sizes, an ICO built from
//! the smallest and an Apple touch icon resampled from the largest.

use std::path::Path;

use crate::{
    assets::{self, APPLE_TOUCH_ICON, FAVICON_ICO},
    config::OptimizedConfig,
    ico,
    render::{self, FontSource},
    touch_icon, GenerateError, GeneratedAssets,
};

/// Generates the optimized favicon set.
///
/// Intermediate PNG favicons are removed at the end, leaving only
/// `retained_size` alongside the ICO and the touch icon.
///
/// # Arguments
/// * `config`: Sizes, colours and fonts to use.
/// * `out_dir`: Directory to write into.
///
/// # Returns
/// The files left on disk, otherwise a [`GenerateError`].
///
/// # Errors
/// If the configuration is invalid, rendering fails or a file cannot be written
/// or removed. A missing font is not an error.
pub fn generate(
    config: &OptimizedConfig,
    out_dir: &Path,
) -> Result<GeneratedAssets, GenerateError> {
    config.validate()?;

    let fonts = FontSource::load(&config.font);

    for size in &config.sizes {
        let icon = render::render_icon(*size, &config.palette, &fonts)?;
        assets::write_png(&out_dir.join(assets::png_file_name(*size)), &icon)?;
    }

    // Built from the files on disk so the ICO matches the PNG exactly.
    let ico_source = image::open(out_dir.join(assets::png_file_name(config.ico_size)))?.into_rgba8();
    let ico_path = out_dir.join(FAVICON_ICO);
    ico::write_file(&ico_path, &[ico_source])?;
    log::info!(
        "Created {} ({size}x{size})",
        ico_path.display(),
        size = config.ico_size
    );

    let retained_path = out_dir.join(assets::png_file_name(config.retained_size));
    let retained = image::open(&retained_path)?.into_rgba8();
    let touch_icon_path = out_dir.join(APPLE_TOUCH_ICON);
    assets::write_png(
        &touch_icon_path,
        &touch_icon::resample(&retained, config.touch_icon_size),
    )?;

    assets::cleanup_intermediates(out_dir, &config.sizes, config.retained_size)?;

    Ok(GeneratedAssets {
        files: vec![retained_path, ico_path, touch_icon_path],
    })
}
