//! `touch_icon`
//!
//! Derives the fixed-size icon mobile platforms use for home screen bookmarks.

use image::{imageops::FilterType, Rgba, Rgba32FImage, RgbaImage};

/// Width and height of an Apple touch icon.
pub const APPLE_TOUCH_ICON_SIZE: u32 = 180;

/// Resamples a square icon to a new size with a Lanczos filter.
///
/// Filtering happens on premultiplied alpha so transparent pixels do not bleed
/// their (black) colour into anti-aliased edges.
///
/// # Arguments
/// * `source`: The icon to resample.
/// * `size`: Width and height of the result.
///
/// # Returns
/// The resampled icon.
pub fn resample(source: &RgbaImage, size: u32) -> RgbaImage {
    let premultiplied = Rgba32FImage::from_fn(source.width(), source.height(), |x, y| {
        let [r, g, b, a] = source.get_pixel(x, y).0.map(|channel| f32::from(channel) / 255.0);
        Rgba([r * a, g * a, b * a, a])
    });

    let resized = image::imageops::resize(&premultiplied, size, size, FilterType::Lanczos3);

    RgbaImage::from_fn(size, size, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        let straight = |channel: f32| if a > 0.0 { channel / a } else { 0.0 };
        Rgba([
            to_channel(straight(r)),
            to_channel(straight(g)),
            to_channel(straight(b)),
            to_channel(a),
        ])
    })
}

/// Converts a `0.0..=1.0` value to an 8-bit channel, clamping filter overshoot.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
