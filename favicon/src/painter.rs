//! `painter`
//!
//! Paints the classic favicon pixel by pixel: a ball on a plain background with
//! a horizontal stripe across it and a small block hinting at a printed digit.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::Colour;

/// What a single pixel of the classic favicon depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelClass {
    /// Outside the ball.
    Background,
    /// Inside the ball, within the stripe band.
    Stripe,
    /// Inside the ball, within the digit marker.
    Marker,
    /// Anywhere else inside the ball.
    Ball,
}

/// Where the ball, stripe and marker sit on the canvas, in pixels.
///
/// All row and column ranges are inclusive on both ends. Rows count down from
/// the top of the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallGeometry {
    /// Column of the ball's centre.
    pub center_x: i64,
    /// Row of the ball's centre.
    pub center_y: i64,
    /// Radius of the ball.
    pub radius: i64,
    /// First row of the stripe.
    pub band_top: i64,
    /// Last row of the stripe.
    pub band_bottom: i64,
    /// First row of the marker.
    pub marker_top: i64,
    /// Last row of the marker.
    pub marker_bottom: i64,
    /// First column of the marker.
    pub marker_left: i64,
    /// Last column of the marker.
    pub marker_right: i64,
}

impl Default for BallGeometry {
    fn default() -> Self {
        BallGeometry {
            center_x: 8,
            center_y: 8,
            radius: 6,
            band_top: 6,
            band_bottom: 9,
            marker_top: 7,
            marker_bottom: 8,
            marker_left: 6,
            marker_right: 9,
        }
    }
}

impl BallGeometry {
    /// Classifies a single pixel.
    ///
    /// The stripe is checked before the marker, so a marker overlapping the
    /// band is hidden by it.
    ///
    /// # Arguments
    /// * `x`: Column of the pixel.
    /// * `y`: Row of the pixel.
    ///
    /// # Returns
    /// The class of the pixel.
    pub fn classify(&self, x: i64, y: i64) -> PixelClass {
        let dx = x - self.center_x;
        let dy = y - self.center_y;

        if dx * dx + dy * dy > self.radius * self.radius {
            PixelClass::Background
        } else if (self.band_top..=self.band_bottom).contains(&y) {
            PixelClass::Stripe
        } else if (self.marker_top..=self.marker_bottom).contains(&y)
            && (self.marker_left..=self.marker_right).contains(&x)
        {
            PixelClass::Marker
        } else {
            PixelClass::Ball
        }
    }
}

/// The colours of the classic favicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallPalette {
    /// Colour outside the ball.
    pub background: Colour,
    /// Colour of the ball.
    pub ball: Colour,
    /// Colour of the stripe.
    pub stripe: Colour,
    /// Colour of the digit marker.
    pub marker: Colour,
}

impl Default for BallPalette {
    fn default() -> Self {
        BallPalette {
            background: Colour::AMBER,
            ball: Colour::WHITE,
            stripe: Colour::AMBER,
            marker: Colour::WHITE,
        }
    }
}

impl BallPalette {
    /// Gets the colour to paint a class of pixel.
    pub fn colour_for(&self, class: PixelClass) -> Colour {
        match class {
            PixelClass::Background => self.background,
            PixelClass::Stripe => self.stripe,
            PixelClass::Marker => self.marker,
            PixelClass::Ball => self.ball,
        }
    }
}

/// Paints a square canvas.
///
/// # Arguments
/// * `size`: Width and height of the canvas in pixels.
/// * `geometry`: Where the ball and its markings are.
/// * `palette`: The colours to paint with.
///
/// # Returns
/// The painted canvas, top row first.
pub fn paint(size: u32, geometry: &BallGeometry, palette: &BallPalette) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        palette
            .colour_for(geometry.classify(i64::from(x), i64::from(y)))
            .into()
    })
}
