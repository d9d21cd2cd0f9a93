//! `config`
//!
//! Settings for both generators. The defaults produce the stock favicon set;
//! any of them can be overridden from a JSON file.

use std::{fmt, io, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    assets::FAVICON_ICO,
    painter::{BallGeometry, BallPalette},
    render::{FontConfig, IconPalette},
    touch_icon::APPLE_TOUCH_ICON_SIZE,
};

/// Errors that can occur when loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the file.
    FailedToRead(io::Error),
    /// The file is not valid JSON for this configuration.
    FailedToParse(serde_json::Error),
    /// The configuration parsed but cannot be used.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FailedToRead(err) => write!(f, "failed to read config: {err}"),
            ConfigError::FailedToParse(err) => write!(f, "failed to parse config: {err}"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FailedToRead(err) => Some(err),
            ConfigError::FailedToParse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Settings for the classic, single image favicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicConfig {
    /// Width and height of the icon.
    pub size: u32,
    /// Name of the ICO file to write.
    pub file_name: String,
    /// Where the ball and its markings are.
    pub geometry: BallGeometry,
    /// The colours to paint with.
    pub palette: BallPalette,
}

impl Default for ClassicConfig {
    fn default() -> Self {
        ClassicConfig {
            size: 16,
            file_name: FAVICON_ICO.to_string(),
            geometry: BallGeometry::default(),
            palette: BallPalette::default(),
        }
    }
}

impl ClassicConfig {
    /// Checks the settings can produce an icon.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=crate::ico::MAX_DIMENSION).contains(&self.size) {
            return Err(ConfigError::Invalid(format!(
                "size {} must be between 1 and {}",
                self.size,
                crate::ico::MAX_DIMENSION
            )));
        }
        if self.file_name.is_empty() {
            return Err(ConfigError::Invalid("file_name is empty".to_string()));
        }
        Ok(())
    }
}

/// Settings for the optimized, multi-size favicon set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizedConfig {
    /// Every size a PNG favicon is rendered at.
    pub sizes: Vec<u32>,
    /// The PNG favicon left on disk once done, used by the web manifest.
    pub retained_size: u32,
    /// The PNG favicon the ICO file is built from.
    pub ico_size: u32,
    /// Width and height of the touch icon, resampled from `retained_size`.
    pub touch_icon_size: u32,
    /// Colours of the icon.
    pub palette: IconPalette,
    /// Where to find a font for the digit.
    pub font: FontConfig,
}

impl Default for OptimizedConfig {
    fn default() -> Self {
        OptimizedConfig {
            sizes: vec![48, 96, 144, 192],
            retained_size: 192,
            ico_size: 48,
            touch_icon_size: APPLE_TOUCH_ICON_SIZE,
            palette: IconPalette::default(),
            font: FontConfig::default(),
        }
    }
}

impl OptimizedConfig {
    /// Checks the settings can produce a favicon set.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.contains(&0) || self.touch_icon_size == 0 {
            return Err(ConfigError::Invalid("sizes must be non-zero".to_string()));
        }
        if !self.sizes.contains(&self.retained_size) {
            return Err(ConfigError::Invalid(format!(
                "retained_size {} is not one of the sizes",
                self.retained_size
            )));
        }
        if !self.sizes.contains(&self.ico_size) {
            return Err(ConfigError::Invalid(format!(
                "ico_size {} is not one of the sizes",
                self.ico_size
            )));
        }
        if self.ico_size > crate::ico::MAX_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "ico_size {} is larger than an icon can be",
                self.ico_size
            )));
        }
        Ok(())
    }
}

/// Reads a configuration from a JSON file. Missing fields take their defaults.
///
/// # Arguments
/// * `path`: The file to read.
///
/// # Returns
/// The configuration if it was read and parsed, otherwise a [`ConfigError`].
///
/// # Errors
/// See [`ConfigError`].
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(ConfigError::FailedToRead)?;
    serde_json::from_str(&text).map_err(ConfigError::FailedToParse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Colour;

    #[test]
    fn test_defaults_are_valid() {
        ClassicConfig::default().validate().unwrap();
        OptimizedConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: OptimizedConfig = serde_json::from_str(
            r##"{ "palette": { "stripe": "#1d4ed8" }, "font": { "use_system_fonts": false } }"##,
        )
        .unwrap();

        assert_eq!(config.palette.stripe, Colour::opaque(0x1d, 0x4e, 0xd8));
        assert_eq!(config.palette.ball, Colour::WHITE, "untouched colour");
        assert!(!config.font.use_system_fonts);
        assert_eq!(config.sizes, vec![48, 96, 144, 192], "untouched sizes");
    }

    #[test]
    fn test_invalid_optimized_config() {
        let missing_retained = OptimizedConfig {
            retained_size: 256,
            ..OptimizedConfig::default()
        };
        assert!(matches!(
            missing_retained.validate(),
            Err(ConfigError::Invalid(_))
        ));

        let zero = OptimizedConfig {
            sizes: vec![0, 48, 192],
            ..OptimizedConfig::default()
        };
        assert!(zero.validate().is_err(), "zero size");

        let too_big = OptimizedConfig {
            sizes: vec![300],
            retained_size: 300,
            ico_size: 300,
            ..OptimizedConfig::default()
        };
        assert!(too_big.validate().is_err(), "ico too large");
    }

    #[test]
    fn test_invalid_classic_config() {
        let config = ClassicConfig {
            size: 0,
            ..ClassicConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favicon.json");
        std::fs::write(&path, r#"{ "size": 32 }"#).unwrap();

        let config: ClassicConfig = load(&path).unwrap();
        assert_eq!(config.size, 32);
        assert_eq!(config.geometry, BallGeometry::default());

        assert!(matches!(
            load::<ClassicConfig>(&dir.path().join("missing.json")),
            Err(ConfigError::FailedToRead(_))
        ));
    }
}
