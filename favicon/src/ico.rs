//! `ico`
//!
//! Builds ICO containers by hand.
//!
//! An ICO file is a 6 byte header, one 16 byte directory entry per image and
//! then, for each image, a 40 byte `BITMAPINFOHEADER` followed by its pixels.
//! Every multi-byte field is little-endian. Pixels are 32-bit BGRA and the rows
//! run from the bottom of the image to the top. The bitmap header declares twice
//! the real height because consumers expect room for an AND mask after the
//! colour data. No AND mask is written, the alpha channel carries transparency.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use image::RgbaImage;

/// Length of the file header in bytes.
pub const HEADER_LEN: u32 = 6;
/// Length of a directory entry in bytes.
pub const DIR_ENTRY_LEN: u32 = 16;
/// Length of a `BITMAPINFOHEADER` in bytes.
pub const BITMAP_INFO_HEADER_LEN: u32 = 40;
/// Largest width or height an ICO directory entry can describe.
pub const MAX_DIMENSION: u32 = 256;

/// Resource type of an icon, as opposed to a cursor (2).
const RESOURCE_TYPE_ICON: u16 = 1;
/// Every image is stored as 32-bit BGRA.
const BITS_PER_PIXEL: u16 = 32;
/// Bytes per pixel at [`BITS_PER_PIXEL`].
const BYTES_PER_PIXEL: u32 = 4;
/// `BI_RGB`, uncompressed.
const COMPRESSION_NONE: u32 = 0;

/// Errors that can occur when building an ICO file.
#[derive(Debug)]
pub enum IcoError {
    /// An ICO file needs at least one image.
    NoImages,
    /// More images than the header's 16-bit count can describe.
    TooManyImages(usize),
    /// An image is empty or larger than [`MAX_DIMENSION`] on a side.
    UnsupportedDimensions {
        /// Width of the offending image.
        width: u32,
        /// Height of the offending image.
        height: u32,
    },
    /// The images would push an offset past what 32 bits can address.
    ContainerTooLarge,
    /// Failed to write the file.
    FailedToWrite(io::Error),
}

impl fmt::Display for IcoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcoError::NoImages => f.write_str("an icon needs at least one image"),
            IcoError::TooManyImages(count) => {
                write!(f, "{count} images do not fit in a single icon")
            }
            IcoError::UnsupportedDimensions { width, height } => write!(
                f,
                "{width}x{height} is not a valid icon size, sides must be 1 to {MAX_DIMENSION} pixels"
            ),
            IcoError::ContainerTooLarge => f.write_str("icon would exceed 4 GiB"),
            IcoError::FailedToWrite(err) => write!(f, "failed to write icon: {err}"),
        }
    }
}

impl std::error::Error for IcoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IcoError::FailedToWrite(err) => Some(err),
            _ => None,
        }
    }
}

/// Describes one image of an ICO file, as written to its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirEntry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Length of the bitmap header plus the pixel data.
    pub bytes_in_resource: u32,
    /// Absolute position of the bitmap header in the file.
    pub image_offset: u32,
}

impl IconDirEntry {
    /// Length of the pixel data alone, without the bitmap header.
    pub fn pixel_data_len(&self) -> u32 {
        self.width * self.height * BYTES_PER_PIXEL
    }

    /// Position in the file just past this image's data.
    pub fn end_offset(&self) -> u32 {
        self.image_offset + self.bytes_in_resource
    }

    /// Appends the 16 byte directory entry.
    ///
    /// # Arguments
    /// * `out`: The buffer to append to.
    fn write(&self, out: &mut Vec<u8>) {
        out.push(dimension_byte(self.width));
        out.push(dimension_byte(self.height));
        // Colour count, 0 as there is no palette.
        out.push(0);
        // Reserved.
        out.push(0);
        // Colour planes.
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        out.extend_from_slice(&self.bytes_in_resource.to_le_bytes());
        out.extend_from_slice(&self.image_offset.to_le_bytes());
    }

    /// Appends the 40 byte `BITMAPINFOHEADER` that precedes the pixels.
    ///
    /// # Arguments
    /// * `out`: The buffer to append to.
    fn write_bitmap_info_header(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&BITMAP_INFO_HEADER_LEN.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        // Doubled, the lower half would be the AND mask.
        out.extend_from_slice(&(self.height * 2).to_le_bytes());
        // Colour planes.
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        out.extend_from_slice(&COMPRESSION_NONE.to_le_bytes());
        out.extend_from_slice(&self.pixel_data_len().to_le_bytes());
        // Horizontal and vertical pixels per metre.
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        // Colours used and colours important.
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
    }
}

/// The one-byte form of a width or height, where 0 means 256.
#[allow(clippy::cast_possible_truncation)]
fn dimension_byte(value: u32) -> u8 {
    if value >= MAX_DIMENSION {
        0
    } else {
        value as u8
    }
}

/// Works out the directory for a set of images without encoding anything.
///
/// # Arguments
/// * `images`: The images to be stored, in order.
///
/// # Returns
/// One entry per image with its offset and length, otherwise an [`IcoError`] if
/// the images cannot be stored in an ICO file.
///
/// # Errors
/// See [`IcoError`].
pub fn directory(images: &[RgbaImage]) -> Result<Vec<IconDirEntry>, IcoError> {
    if images.is_empty() {
        return Err(IcoError::NoImages);
    }
    let count = u16::try_from(images.len()).map_err(|_| IcoError::TooManyImages(images.len()))?;

    let mut next_offset = u64::from(HEADER_LEN) + u64::from(DIR_ENTRY_LEN) * u64::from(count);
    let mut entries = Vec::with_capacity(images.len());

    for image in images {
        let (width, height) = image.dimensions();
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(IcoError::UnsupportedDimensions { width, height });
        }

        let bytes_in_resource = BITMAP_INFO_HEADER_LEN + width * height * BYTES_PER_PIXEL;
        let image_offset =
            u32::try_from(next_offset).map_err(|_| IcoError::ContainerTooLarge)?;
        next_offset += u64::from(bytes_in_resource);

        entries.push(IconDirEntry {
            width,
            height,
            bytes_in_resource,
            image_offset,
        });
    }

    if u32::try_from(next_offset).is_err() {
        return Err(IcoError::ContainerTooLarge);
    }

    Ok(entries)
}

/// Encodes a set of images as an ICO file.
///
/// # Arguments
/// * `images`: The images to store, in the order they should appear.
///
/// # Returns
/// The bytes of the ICO file, otherwise an [`IcoError`].
///
/// # Errors
/// See [`IcoError`], writing to memory cannot fail.
pub fn encode(images: &[RgbaImage]) -> Result<Vec<u8>, IcoError> {
    let entries = directory(images)?;
    let total_len = entries.last().map_or(0, IconDirEntry::end_offset);
    let mut out = Vec::with_capacity(total_len as usize);

    // Reserved.
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&RESOURCE_TYPE_ICON.to_le_bytes());
    let count = u16::try_from(entries.len()).map_err(|_| IcoError::TooManyImages(entries.len()))?;
    out.extend_from_slice(&count.to_le_bytes());

    for entry in &entries {
        entry.write(&mut out);
    }

    for (entry, image) in entries.iter().zip(images) {
        debug_assert_eq!(
            out.len(),
            entry.image_offset as usize,
            "image data must start where the directory says"
        );
        entry.write_bitmap_info_header(&mut out);
        write_pixels(&mut out, image);
    }

    debug_assert_eq!(out.len(), total_len as usize, "declared length must match");
    Ok(out)
}

/// Appends the pixels of an image as BGRA, bottom row first.
///
/// # Arguments
/// * `out`: The buffer to append to.
/// * `image`: The image to take pixels from.
fn write_pixels(out: &mut Vec<u8>, image: &RgbaImage) {
    for row in image.rows().rev() {
        for pixel in row {
            let [r, g, b, a] = pixel.0;
            out.extend_from_slice(&[b, g, r, a]);
        }
    }
}

/// Encodes a set of images and writes them to an ICO file.
///
/// # Arguments
/// * `path`: Where to write the file, it will be replaced if it exists.
/// * `images`: The images to store.
///
/// # Returns
/// `Ok(())` if the file was written, otherwise an [`IcoError`].
///
/// # Errors
/// See [`IcoError`]. Nothing is written if the images cannot be encoded.
pub fn write_file(path: &Path, images: &[RgbaImage]) -> Result<(), IcoError> {
    let bytes = encode(images)?;

    let mut file = BufWriter::new(File::create(path).map_err(IcoError::FailedToWrite)?);
    file.write_all(&bytes).map_err(IcoError::FailedToWrite)?;
    file.flush().map_err(IcoError::FailedToWrite)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads a little-endian `u16` at `at`.
    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    /// Reads a little-endian `u32` at `at`.
    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn test_single_16x16_layout() {
        let image = RgbaImage::from_pixel(16, 16, image::Rgba([0xd9, 0x77, 0x06, 0xff]));
        let bytes = encode(&[image]).unwrap();

        assert_eq!(bytes.len(), 6 + 16 + 40 + 16 * 16 * 4, "file length");

        // Header.
        assert_eq!(u16_at(&bytes, 0), 0, "reserved");
        assert_eq!(u16_at(&bytes, 2), 1, "type");
        assert_eq!(u16_at(&bytes, 4), 1, "count");

        // Directory entry.
        assert_eq!(&bytes[6..10], &[16, 16, 0, 0], "width, height, colours, reserved");
        assert_eq!(u16_at(&bytes, 10), 1, "planes");
        assert_eq!(u16_at(&bytes, 12), 32, "bits per pixel");
        assert_eq!(u32_at(&bytes, 14), 16 * 16 * 4 + 40, "bytes in resource");
        assert_eq!(u32_at(&bytes, 18), 22, "offset");

        // Bitmap info header.
        assert_eq!(u32_at(&bytes, 22), 40, "header size");
        assert_eq!(u32_at(&bytes, 26), 16, "width");
        assert_eq!(u32_at(&bytes, 30), 32, "doubled height");
        assert_eq!(u16_at(&bytes, 34), 1, "planes");
        assert_eq!(u16_at(&bytes, 36), 32, "bit count");
        assert_eq!(u32_at(&bytes, 38), 0, "compression");
        assert_eq!(u32_at(&bytes, 42), 16 * 16 * 4, "image size");
        assert!(bytes[46..62].iter().all(|b| *b == 0), "resolution and palette");

        // First pixel, BGRA.
        assert_eq!(&bytes[62..66], &[0x06, 0x77, 0xd9, 0xff]);
    }

    #[test]
    fn test_rows_are_bottom_up() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, image::Rgba([1, 2, 3, 4]));
        image.put_pixel(1, 1, image::Rgba([5, 6, 7, 8]));

        let bytes = encode(&[image]).unwrap();
        let pixels = &bytes[62..];

        assert_eq!(
            pixels,
            &[0, 0, 0, 0, 7, 6, 5, 8, 3, 2, 1, 4, 0, 0, 0, 0],
            "bottom row first, channels swapped to BGRA"
        );
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let images = [16, 32, 48, 256]
            .map(|size| RgbaImage::new(size, size))
            .to_vec();

        let entries = directory(&images).unwrap();
        assert_eq!(entries[0].image_offset, 6 + 16 * 4, "first image after directory");
        for pair in entries.windows(2) {
            assert!(pair[1].image_offset > pair[0].image_offset, "strictly increasing");
            assert_eq!(pair[1].image_offset, pair[0].end_offset(), "no gaps");
        }
        for entry in &entries {
            assert_eq!(entry.pixel_data_len(), entry.width * entry.height * 4);
            assert_eq!(entry.bytes_in_resource, entry.pixel_data_len() + 40);
        }

        let bytes = encode(&images).unwrap();
        assert_eq!(bytes.len() as u32, entries[3].end_offset(), "file ends after last image");
        for (index, entry) in entries.iter().enumerate() {
            let at = 6 + 16 * index;
            assert_eq!(u32_at(&bytes, at + 8), entry.bytes_in_resource);
            assert_eq!(u32_at(&bytes, at + 12), entry.image_offset);
            assert_eq!(
                u32_at(&bytes, entry.image_offset as usize),
                40,
                "bitmap header at recorded offset"
            );
        }
        // 256 is stored as 0.
        assert_eq!(&bytes[6 + 16 * 3..6 + 16 * 3 + 2], &[0, 0]);
    }

    #[test]
    fn test_rejects_unsupported_images() {
        assert!(matches!(encode(&[]), Err(IcoError::NoImages)));
        assert!(matches!(
            encode(&[RgbaImage::new(257, 257)]),
            Err(IcoError::UnsupportedDimensions {
                width: 257,
                height: 257
            })
        ));
        assert!(matches!(
            encode(&[RgbaImage::new(0, 0)]),
            Err(IcoError::UnsupportedDimensions { .. })
        ));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favicon.ico");

        write_file(&path, &[RgbaImage::new(48, 48)]).unwrap();

        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            6 + 16 + 40 + 48 * 48 * 4
        );
    }
}
