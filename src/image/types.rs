//! Core image types shared by capture, editing and the gallery.

use crate::error::{Result, StudioError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Parses a MIME type such as `image/png`.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Aspect ratio requested from the professional tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 3:4 portrait, the print-oriented default.
    #[serde(rename = "3:4")]
    StandardPortrait,
}

impl AspectRatio {
    /// Returns the aspect ratio as a string (e.g., "3:4").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StandardPortrait => "3:4",
        }
    }
}

/// Output resolution tier for the professional model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    /// Roughly 1024px on the long edge.
    #[serde(rename = "1K")]
    OneK,
}

impl ImageSize {
    /// Returns the wire identifier (e.g., "1K").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneK => "1K",
        }
    }
}

/// An encoded bitmap, the unit every component passes around.
///
/// Mirrors a `data:<mime>;base64,<payload>` URL: the bytes are kept
/// encoded in `format`, never as raw pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// Encoding of `data`.
    pub format: ImageFormat,
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("format", &self.format)
            .field("len", &self.data.len())
            .finish()
    }
}

impl ImageData {
    /// Wraps bytes already known to be in `format`.
    pub fn new(data: Vec<u8>, format: ImageFormat) -> Self {
        Self { data, format }
    }

    /// Wraps bytes, detecting the format from magic bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = ImageFormat::from_magic_bytes(&data)
            .ok_or_else(|| StudioError::Decode("Unknown image format".into()))?;
        Ok(Self::new(data, format))
    }

    /// Decodes a base64 payload, with or without a `data:` prefix.
    ///
    /// A MIME type inside the prefix wins over `fallback`.
    pub fn from_base64(input: &str, fallback: ImageFormat) -> Result<Self> {
        let (format, payload) = match input.find(";base64,") {
            Some(pos) => {
                let mime = input[..pos].trim_start_matches("data:");
                let format = ImageFormat::from_mime_type(mime).unwrap_or(fallback);
                (format, &input[pos + 8..])
            }
            None => (fallback, input),
        };

        let cleaned: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let data = base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(&cleaned))
            .map_err(|e| StudioError::Decode(e.to_string()))?;

        Ok(Self::new(data, format))
    }

    /// Parses a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        if !url.starts_with("data:") || !url.contains(";base64,") {
            return Err(StudioError::Decode("not a base64 data URL".into()));
        }
        Self::from_base64(url, ImageFormat::Png)
    }

    /// Returns the size of the encoded data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Decodes the bitmap into pixels.
    pub fn decode(&self) -> Result<image::DynamicImage> {
        Ok(image::load_from_memory_with_format(
            &self.data,
            self.format.into(),
        )?)
    }

    /// Returns the pixel dimensions `(width, height)`.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let img = self.decode()?;
        Ok((img.width(), img.height()))
    }

    /// Encodes pixels as PNG.
    pub fn encode_png(img: &image::DynamicImage) -> Result<Self> {
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)?;
        Ok(Self::new(buf.into_inner(), ImageFormat::Png))
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            self.to_base64()
        )
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    /// Builds a PNG of the given size with a horizontal gradient.
    pub(crate) fn png(width: u32, height: u32) -> ImageData {
        let buf = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        ImageData::encode_png(&image::DynamicImage::ImageRgba8(buf)).unwrap()
    }

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"short"), None);
    }

    #[test]
    fn test_format_from_mime_type() {
        assert_eq!(ImageFormat::from_mime_type("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime_type("IMAGE/JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime_type("text/plain"), None);
    }

    #[test]
    fn test_data_url_parsing() {
        let img = ImageData::from_data_url("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(img.format, ImageFormat::Jpeg);
        assert_eq!(&img.data[..3], &[0xFF, 0xD8, 0xFF]);

        assert!(ImageData::from_data_url("https://example.com/a.png").is_err());
    }

    #[test]
    fn test_base64_lenient_padding() {
        let img = ImageData::from_base64("iVBORw0KGgo", ImageFormat::Png).unwrap();
        assert_eq!(&img.data[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_data_url_prefix() {
        let img = png(3, 2);
        let url = img.to_data_url();
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
        assert_eq!(ImageData::from_data_url(&url).unwrap(), img);
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(png(7, 4).dimensions().unwrap(), (7, 4));
    }

    #[test]
    fn test_wire_identifiers() {
        assert_eq!(AspectRatio::StandardPortrait.as_str(), "3:4");
        assert_eq!(ImageSize::OneK.as_str(), "1K");
        assert_eq!(
            serde_json::to_string(&AspectRatio::StandardPortrait).unwrap(),
            "\"3:4\""
        );
    }
}
