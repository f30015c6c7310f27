//! Inline images: format detection, dimension probing, and EMU scaling.

use crate::error::{Error, Result};

/// EMUs (English Metric Units) per inch.
pub const EMU_PER_INCH: f64 = 914400.0;

/// Raster image formats accepted for embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Detect image format from byte signature.
    pub fn detect_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }

        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        if data.starts_with(b"BM") {
            return Some(Self::Bmp);
        }

        // TIFF, little-endian and big-endian
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(Self::Tiff);
        }

        None
    }

    /// File extension used for the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// MIME type for the content types stream.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Read pixel dimensions (width, height) from an image header.
///
/// TIFF dimensions live in IFD entries and are not probed; callers fall back
/// to a square extent.
fn pixel_dimensions(format: ImageFormat, data: &[u8]) -> Option<(u32, u32)> {
    match format {
        ImageFormat::Png => {
            // IHDR width/height at offsets 16 and 20, big-endian
            if data.len() < 24 {
                return None;
            }
            let w = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
            let h = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
            Some((w, h))
        },
        ImageFormat::Jpeg => {
            // Walk segment markers until a start-of-frame carries the size
            let mut i = 2usize;
            while i + 9 < data.len() {
                if data[i] != 0xFF {
                    return None;
                }
                let marker = data[i + 1];
                match marker {
                    0xC0..=0xCF if marker != 0xC4 && marker != 0xC8 && marker != 0xCC => {
                        let h = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
                        let w = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
                        return Some((w, h));
                    },
                    0xD8 | 0x01 | 0xD0..=0xD7 => i += 2,
                    _ => {
                        let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
                        i += 2 + len;
                    },
                }
            }
            None
        },
        ImageFormat::Gif => {
            if data.len() < 10 {
                return None;
            }
            let w = u16::from_le_bytes([data[6], data[7]]) as u32;
            let h = u16::from_le_bytes([data[8], data[9]]) as u32;
            Some((w, h))
        },
        ImageFormat::Bmp => {
            if data.len() < 26 {
                return None;
            }
            let w = i32::from_le_bytes([data[18], data[19], data[20], data[21]]);
            let h = i32::from_le_bytes([data[22], data[23], data[24], data[25]]);
            Some((w.unsigned_abs(), h.unsigned_abs()))
        },
        ImageFormat::Tiff => None,
    }
}

/// An embedded image anchored inside a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Image binary data
    pub(crate) data: Vec<u8>,
    /// Image format
    pub(crate) format: ImageFormat,
    /// Display width in EMUs
    pub(crate) width_emu: i64,
    /// Display height in EMUs
    pub(crate) height_emu: i64,
    /// Relationship ID inside the package, once anchored
    pub(crate) rel_id: Option<String>,
}

impl InlineImage {
    /// Create an inline image from bytes at the requested display width.
    ///
    /// Height follows the image's own aspect ratio; when pixel dimensions
    /// cannot be probed the extent is square.
    pub fn from_bytes(data: Vec<u8>, width_inches: f64) -> Result<Self> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| Error::InvalidImageData("unrecognized image format".to_string()))?;

        let width_emu = (width_inches * EMU_PER_INCH) as i64;
        let height_emu = match pixel_dimensions(format, &data) {
            Some((w, h)) if w > 0 => ((width_emu as f64) * (h as f64) / (w as f64)) as i64,
            _ => width_emu,
        };

        Ok(Self {
            data,
            format,
            width_emu,
            height_emu,
            rel_id: None,
        })
    }

    /// Reconstruct a decoded image with a known extent and relationship.
    pub(crate) fn from_package(
        data: Vec<u8>,
        format: ImageFormat,
        width_emu: i64,
        height_emu: i64,
        rel_id: String,
    ) -> Self {
        Self {
            data,
            format,
            width_emu,
            height_emu,
            rel_id: Some(rel_id),
        }
    }

    /// Replace the payload and display width, keeping the anchoring
    /// relationship so the same package part is overwritten.
    pub fn replace_with(&mut self, data: Vec<u8>, width_inches: f64) -> Result<()> {
        let rel_id = self.rel_id.clone();
        let mut fresh = Self::from_bytes(data, width_inches)?;
        fresh.rel_id = rel_id;
        *self = fresh;
        Ok(())
    }

    /// Image binary data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Image format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Display width in EMUs.
    pub fn width_emu(&self) -> i64 {
        self.width_emu
    }

    /// Display height in EMUs.
    pub fn height_emu(&self) -> i64 {
        self.height_emu
    }
}

/// Minimal PNG header for tests: signature + IHDR length/type + dimensions.
#[cfg(test)]
pub(crate) fn test_png_header(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data
}
