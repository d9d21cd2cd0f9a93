//! `classic`
//!
//! The classic favicon: one small image painted pixel by pixel into an ICO file.

use std::path::Path;

use crate::{config::ClassicConfig, ico, painter, GenerateError, GeneratedAssets};

/// Paints the classic favicon and writes it as an ICO file.
///
/// # Arguments
/// * `config`: What to paint and where to write it.
/// * `out_dir`: Directory to write into.
///
/// # Returns
/// The file written, otherwise a [`GenerateError`].
///
/// # Errors
/// If the configuration is invalid or the file cannot be written.
pub fn generate(config: &ClassicConfig, out_dir: &Path) -> Result<GeneratedAssets, GenerateError> {
    config.validate()?;

    let canvas = painter::paint(config.size, &config.geometry, &config.palette);

    let path = out_dir.join(&config.file_name);
    ico::write_file(&path, &[canvas])?;
    log::info!(
        "Created {} ({size}x{size})",
        path.display(),
        size = config.size
    );

    Ok(GeneratedAssets { files: vec![path] })
}
