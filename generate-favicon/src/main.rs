//! `generate-favicon`
//!
//! Writes the classic 16x16 `favicon.ico` into the current directory.
//!
//! Takes an optional path to a JSON file overriding the default
//! [`favicon::ClassicConfig`].

use std::path::{Path, PathBuf};

use favicon::{classic, config, ClassicConfig, GenerateError};

fn main() -> Result<(), GenerateError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Using config {}", path.display());
            config::load(&path)?
        }
        None => ClassicConfig::default(),
    };

    let assets = classic::generate(&config, Path::new("."))?;
    for file in &assets.files {
        log::info!("{} created successfully", file.display());
    }

    Ok(())
}
