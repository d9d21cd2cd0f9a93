//! `generate-optimized-favicon`
//!
//! Writes the optimized favicon set into the current directory: `favicon.ico`,
//! `apple-touch-icon.png` and `favicon-192x192.png` for the web manifest.
//!
//! Takes an optional path to a JSON file overriding the default
//! [`favicon::OptimizedConfig`].

use std::path::{Path, PathBuf};

use favicon::{config, optimized, GenerateError, OptimizedConfig};

fn main() -> Result<(), GenerateError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Using config {}", path.display());
            config::load(&path)?
        }
        None => OptimizedConfig::default(),
    };

    let assets = optimized::generate(&config, Path::new("."))?;

    log::info!("All favicon files created successfully:");
    for file in &assets.files {
        log::info!("- {}", file.display());
    }

    Ok(())
}
