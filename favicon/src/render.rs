//! `render`
//!
//! Draws the optimized favicon (an outlined ball, a stripe and the digit "8")
//! as an SVG document and rasterises it with `resvg`.

use std::{fmt, path::PathBuf, sync::Arc};

use image::RgbaImage;
use resvg::{tiny_skia, usvg};
use serde::{Deserialize, Serialize};

use crate::Colour;

/// The smallest icon that gets a digit drawn on it.
pub const MIN_DIGIT_SIZE: u32 = 48;
/// The digit printed on the ball.
const DIGIT: &str = "8";

/// Errors that can occur when rendering an icon.
#[derive(Debug)]
pub enum RenderError {
    /// The generated SVG could not be parsed.
    InvalidSvg(usvg::Error),
    /// A canvas of this size could not be allocated.
    FailedToAllocate(u32),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidSvg(err) => write!(f, "generated SVG is invalid: {err}"),
            RenderError::FailedToAllocate(size) => {
                write!(f, "could not allocate a {size}x{size} canvas")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::InvalidSvg(err) => Some(err),
            RenderError::FailedToAllocate(_) => None,
        }
    }
}

/// The colours of the optimized favicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconPalette {
    /// Colour behind the ball.
    pub background: Colour,
    /// Fill of the ball.
    pub ball: Colour,
    /// Fill of the stripe.
    pub stripe: Colour,
    /// Outline of the ball.
    pub border: Colour,
    /// Colour of the digit.
    pub digit: Colour,
}

impl Default for IconPalette {
    fn default() -> Self {
        IconPalette {
            background: Colour::TRANSPARENT,
            ball: Colour::WHITE,
            stripe: Colour::AMBER,
            border: Colour::SLATE,
            digit: Colour::SLATE,
        }
    }
}

/// Where to find a font for the digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file tried first.
    pub preferred_font: PathBuf,
    /// Family looked for among the system fonts when the preferred font is missing.
    pub fallback_family: String,
    /// Whether the system fonts may be used at all.
    pub use_system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            preferred_font: PathBuf::from("/System/Library/Fonts/Arial.ttf"),
            fallback_family: "Arial".to_string(),
            use_system_fonts: true,
        }
    }
}

/// The fonts available for drawing the digit.
///
/// Loading never fails. With no usable font at all the digit is left out.
#[derive(Clone, Default)]
pub struct FontSource {
    /// Fonts to hand to `usvg`, `None` when there are none.
    database: Option<Arc<usvg::fontdb::Database>>,
    /// Family name the digit is set in.
    family: Option<String>,
}

impl FontSource {
    /// A font source with no fonts, so digits are never drawn.
    pub fn none() -> Self {
        FontSource::default()
    }

    /// Loads fonts, preferring the configured font file.
    ///
    /// # Arguments
    /// * `config`: Which fonts to look for.
    ///
    /// # Returns
    /// The fonts found, possibly none.
    pub fn load(config: &FontConfig) -> Self {
        let mut database = usvg::fontdb::Database::new();

        if config.preferred_font.is_file() {
            if let Err(err) = database.load_font_file(&config.preferred_font) {
                log::warn!(
                    "Could not load font {}: {err}",
                    config.preferred_font.display()
                );
            }
        }

        if database.is_empty() && config.use_system_fonts {
            log::warn!(
                "Font {} unavailable, falling back to system fonts",
                config.preferred_font.display()
            );
            database.load_system_fonts();
        }

        let Some(family) = pick_family(&database, &config.fallback_family) else {
            log::info!("No fonts available, digits will be left out");
            return FontSource::none();
        };

        log::debug!("Drawing digits in {family}");
        database.set_sans_serif_family(family.clone());

        FontSource {
            database: Some(Arc::new(database)),
            family: Some(family),
        }
    }

    /// Gets the family name the digit is set in, if any font is available.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }
}

/// Sans-serif families tried, in order, when the wanted family is missing.
const SANS_SERIF_FAMILIES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
    "Roboto",
];

/// Chooses the family to set the digit in.
///
/// # Arguments
/// * `database`: The loaded fonts.
/// * `wanted`: The family to use if it is present.
///
/// # Returns
/// `wanted` if present, else a well known sans-serif family, else any family
/// that calls itself sans, else the first family in the database, else `None`.
fn pick_family(database: &usvg::fontdb::Database, wanted: &str) -> Option<String> {
    use usvg::fontdb::{Family, Query};

    let mut families = vec![Family::Name(wanted)];
    families.extend(SANS_SERIF_FAMILIES.iter().copied().map(Family::Name));
    families.push(Family::SansSerif);

    let query = Query {
        families: &families,
        ..Query::default()
    };

    let face = database
        .query(&query)
        .and_then(|id| database.face(id))
        .or_else(|| {
            database
                .faces()
                .find(|face| face.families.iter().any(|(name, _)| looks_sans(name)))
        })
        .or_else(|| database.faces().next())?;

    face.families.first().map(|(name, _)| name.clone())
}

/// Whether a family name suggests a plain sans-serif text face.
fn looks_sans(family: &str) -> bool {
    let family = family.to_ascii_lowercase();
    family.contains("sans") && !family.contains("mono") && !family.contains("math")
}

/// Proportions of the optimized favicon at a given size, all in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGeometry {
    /// Width and height of the icon.
    pub size: u32,
    /// Row and column of the centre pixel.
    pub center: u32,
    /// Radius of the ball, 35% of the size.
    pub ball_radius: u32,
    /// Height of the stripe, 15% of the size.
    pub stripe_height: u32,
    /// Width of the ball's outline.
    pub border_width: u32,
    /// Size the digit is set at.
    pub font_size: u32,
}

impl IconGeometry {
    /// Works out the proportions for an icon.
    ///
    /// # Arguments
    /// * `size`: Width and height of the icon in pixels.
    pub fn for_size(size: u32) -> Self {
        IconGeometry {
            size,
            center: size / 2,
            ball_radius: size * 35 / 100,
            stripe_height: size * 15 / 100,
            border_width: (size / 32).max(1),
            font_size: (size / 4).max(8),
        }
    }

    /// Whether the icon is big enough for a legible digit.
    pub fn draws_digit(&self) -> bool {
        self.size >= MIN_DIGIT_SIZE
    }
}

/// Builds the SVG for an icon.
///
/// Pixel `n` covers `n..n + 1` in SVG units, so the ball is centred on the
/// middle of the centre pixel and spans `ball_radius` whole pixels either side
/// of it. The outline is drawn inside the ball's edge.
///
/// # Arguments
/// * `geometry`: Proportions of the icon.
/// * `palette`: Colours of the icon.
/// * `font_family`: Family to set the digit in, `None` leaves the digit out.
///
/// # Returns
/// The SVG document.
#[allow(clippy::cast_precision_loss)]
pub fn svg_document(
    geometry: &IconGeometry,
    palette: &IconPalette,
    font_family: Option<&str>,
) -> String {
    let size = geometry.size;
    let middle = geometry.center as f32 + 0.5;
    let border = geometry.border_width as f32;
    let outline_radius = geometry.ball_radius as f32 + 0.5 - border / 2.0;

    let center = i64::from(geometry.center);
    let inset = i64::from(geometry.ball_radius) - i64::from(geometry.border_width);
    let half_stripe = i64::from(geometry.stripe_height / 2);
    let (stripe_left, stripe_right) = (center - inset, center + inset);
    let (stripe_top, stripe_bottom) = (center - half_stripe, center + half_stripe);

    let mut lines = vec![format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    )];

    if palette.background.alpha() > 0 {
        lines.push(format!(
            r#"<rect width="{size}" height="{size}"{}/>"#,
            paint("fill", palette.background)
        ));
    }

    lines.push(format!(
        r#"<circle cx="{middle}" cy="{middle}" r="{outline_radius}"{}{} stroke-width="{border}"/>"#,
        paint("fill", palette.ball),
        paint("stroke", palette.border),
    ));

    // Tiny icons have no room for a stripe inside the outline.
    if stripe_right >= stripe_left {
        lines.push(format!(
            r#"<rect x="{stripe_left}" y="{stripe_top}" width="{}" height="{}"{}/>"#,
            stripe_right - stripe_left + 1,
            stripe_bottom - stripe_top + 1,
            paint("fill", palette.stripe),
        ));
    }

    if let Some(family) = font_family.filter(|_| geometry.draws_digit()) {
        lines.push(format!(
            r#"<text x="{middle}" y="{middle}" font-family="'{}', sans-serif" font-size="{}" text-anchor="middle" dominant-baseline="central"{}>{DIGIT}</text>"#,
            escape_family(family),
            geometry.font_size,
            paint("fill", palette.digit),
        ));
    }

    lines.push("</svg>".to_string());
    lines.join("\n")
}

/// Formats a fill or stroke attribute, adding an opacity when not opaque.
///
/// # Arguments
/// * `attribute`: `fill` or `stroke`.
/// * `colour`: The colour to paint with.
fn paint(attribute: &str, colour: Colour) -> String {
    let mut painted = format!(r#" {attribute}="{}""#, colour.to_rgb_hex());
    if colour.alpha() != 0xff {
        painted.push_str(&format!(r#" {attribute}-opacity="{}""#, colour.opacity()));
    }
    painted
}

/// Makes a family name safe to put between single quotes in an attribute.
fn escape_family(family: &str) -> String {
    family
        .chars()
        .filter(|c| !matches!(c, '\'' | '"'))
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
}

/// Renders the optimized favicon at one size.
///
/// # Arguments
/// * `size`: Width and height of the icon in pixels.
/// * `palette`: Colours of the icon.
/// * `fonts`: Fonts for the digit, the digit is skipped when there are none.
///
/// # Returns
/// The rendered icon with straight (not premultiplied) alpha, otherwise a
/// [`RenderError`].
///
/// # Errors
/// See [`RenderError`].
pub fn render_icon(
    size: u32,
    palette: &IconPalette,
    fonts: &FontSource,
) -> Result<RgbaImage, RenderError> {
    let geometry = IconGeometry::for_size(size);
    log::debug!("Rendering {geometry:?}");

    let document = svg_document(&geometry, palette, fonts.family());

    let mut options = usvg::Options::default();
    if let Some(database) = &fonts.database {
        options.fontdb = Arc::clone(database);
    }
    let tree =
        usvg::Tree::from_data(document.as_bytes(), &options).map_err(RenderError::InvalidSvg)?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or(RenderError::FailedToAllocate(size))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut icon = RgbaImage::new(size, size);
    for (out, pixel) in icon.pixels_mut().zip(pixmap.pixels()) {
        let colour = pixel.demultiply();
        *out = image::Rgba([colour.red(), colour.green(), colour.blue(), colour.alpha()]);
    }

    Ok(icon)
}
