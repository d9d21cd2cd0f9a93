//! `colour`
//!
//! The colour type shared by every generator.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour(pub [u8; 4]);

impl Colour {
    /// Amber orange used for the background and the stripe.
    pub const AMBER: Colour = Colour::opaque(0xd9, 0x77, 0x06);
    /// Plain white.
    pub const WHITE: Colour = Colour::opaque(0xff, 0xff, 0xff);
    /// Dark slate used for outlines and the digit.
    pub const SLATE: Colour = Colour::opaque(0x37, 0x41, 0x51);
    /// Fully transparent black.
    pub const TRANSPARENT: Colour = Colour([0, 0, 0, 0]);

    /// Creates a fully opaque colour.
    ///
    /// # Arguments
    /// * `r`: Red channel value.
    /// * `g`: Green channel value.
    /// * `b`: Blue channel value.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Colour([r, g, b, 0xff])
    }

    /// Gets the red channel.
    pub fn red(self) -> u8 {
        self.0[0]
    }

    /// Gets the green channel.
    pub fn green(self) -> u8 {
        self.0[1]
    }

    /// Gets the blue channel.
    pub fn blue(self) -> u8 {
        self.0[2]
    }

    /// Gets the alpha channel.
    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    /// The channels in the order ICO bitmaps store them.
    ///
    /// # Returns
    /// `[blue, green, red, alpha]`.
    pub fn to_bgra(self) -> [u8; 4] {
        let [r, g, b, a] = self.0;
        [b, g, r, a]
    }

    /// Formats the colour channels as `#rrggbb`, ignoring alpha.
    ///
    /// SVG fills take opacity separately, see [`Colour::opacity`].
    pub fn to_rgb_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())
    }

    /// The alpha channel as a fraction in `0.0..=1.0`.
    pub fn opacity(self) -> f32 {
        f32::from(self.alpha()) / 255.0
    }
}

impl From<Colour> for image::Rgba<u8> {
    fn from(colour: Colour) -> Self {
        image::Rgba(colour.0)
    }
}

impl From<image::Rgba<u8>> for Colour {
    fn from(pixel: image::Rgba<u8>) -> Self {
        Colour(pixel.0)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha() == 0xff {
            f.write_str(&self.to_rgb_hex())
        } else {
            write!(f, "{}{:02x}", self.to_rgb_hex(), self.alpha())
        }
    }
}

/// A colour string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColourError(String);

impl fmt::Display for ParseColourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid colour {:?}, expected #rrggbb or #rrggbbaa",
            self.0
        )
    }
}

impl std::error::Error for ParseColourError {}

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseColourError(s.to_string());

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |index: usize| {
            u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
        };

        let alpha = if hex.len() == 8 { channel(3)? } else { 0xff };
        Ok(Colour([channel(0)?, channel(1)?, channel(2)?, alpha]))
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
