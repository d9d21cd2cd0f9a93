//! `favicon`
//!
//! Procedurally draws the site's favicon, a ball with a stripe and the digit
//! "8", and writes it out as ICO and PNG files.
//!
//! There are two generators:
//! * [`classic::generate`] paints a single 16x16 image pixel by pixel into a
//!   hand-built ICO file.
//! * [`optimized::generate`] renders PNG favicons at several sizes, builds an
//!   ICO from the 48x48 one and derives an Apple touch icon from the largest.

pub mod assets;
pub mod classic;
mod colour;
pub mod config;
pub mod ico;
pub mod optimized;
pub mod painter;
pub mod render;
pub mod touch_icon;

use std::{fmt, io, path::PathBuf};

pub use colour::{Colour, ParseColourError};
pub use config::{ClassicConfig, ConfigError, OptimizedConfig};
pub use ico::IcoError;
pub use render::RenderError;

/// The files a generator left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAssets {
    /// Every file written and not cleaned up, in the order they were created.
    pub files: Vec<PathBuf>,
}

/// Errors that can occur while generating favicons.
#[derive(Debug)]
pub enum GenerateError {
    /// The configuration could not be loaded or is invalid.
    Config(ConfigError),
    /// The icon could not be drawn.
    Render(RenderError),
    /// The ICO file could not be built or written.
    Ico(IcoError),
    /// A PNG could not be encoded, decoded or written.
    Image(image::ImageError),
    /// A file could not be removed.
    Io(io::Error),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Config(err) => fmt::Display::fmt(err, f),
            GenerateError::Render(err) => fmt::Display::fmt(err, f),
            GenerateError::Ico(err) => fmt::Display::fmt(err, f),
            GenerateError::Image(err) => write!(f, "image error: {err}"),
            GenerateError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Config(err) => Some(err),
            GenerateError::Render(err) => Some(err),
            GenerateError::Ico(err) => Some(err),
            GenerateError::Image(err) => Some(err),
            GenerateError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for GenerateError {
    fn from(err: ConfigError) -> Self {
        GenerateError::Config(err)
    }
}

impl From<RenderError> for GenerateError {
    fn from(err: RenderError) -> Self {
        GenerateError::Render(err)
    }
}

impl From<IcoError> for GenerateError {
    fn from(err: IcoError) -> Self {
        GenerateError::Ico(err)
    }
}

impl From<image::ImageError> for GenerateError {
    fn from(err: image::ImageError) -> Self {
        GenerateError::Image(err)
    }
}

impl From<io::Error> for GenerateError {
    fn from(err: io::Error) -> Self {
        GenerateError::Io(err)
    }
}
