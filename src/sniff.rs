//! Content sniffing for slide images.
//!
//! File extensions are never trusted: a candidate is only served when its
//! leading bytes carry the signature of the format it claims to be.

use std::fmt;

/// Leading bytes of every PNG stream (the full signature is eight bytes; the
/// first four are enough to tell it apart from anything we might serve).
pub const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

/// SOI marker followed by the first byte of the next marker.
pub const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Image formats the slideshow can inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Return `true` if `bytes` starts with this format's signature.
    #[must_use]
    pub fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Png => is_valid_png(bytes),
            Self::Jpeg => is_valid_jpeg(bytes),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        })
    }
}

#[must_use]
pub fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_MAGIC)
}

/// Any marker may follow SOI, so JFIF (`E0`), EXIF (`E1`) and bare
/// quantization tables all pass.
#[must_use]
pub fn is_valid_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&JPEG_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::{ImageFormat, is_valid_jpeg, is_valid_png};

    #[test]
    fn png_signature_requires_four_bytes() {
        assert!(is_valid_png(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(is_valid_png(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]));
        assert!(!is_valid_png(&[]));
        assert!(!is_valid_png(&[0x89, 0x50, 0x4E]));
        assert!(!is_valid_png(&[0x89, 0x50, 0x4E, 0x46]));
        assert!(!is_valid_png(b"GIF89a"));
    }

    #[test]
    fn jpeg_accepts_any_marker_after_soi() {
        assert!(is_valid_jpeg(&[0xFF, 0xD8, 0xFF]));
        assert!(is_valid_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(is_valid_jpeg(&[0xFF, 0xD8, 0xFF, 0xE1, 0x00]));
        assert!(!is_valid_jpeg(&[]));
        assert!(!is_valid_jpeg(&[0xFF]));
        assert!(!is_valid_jpeg(&[0xFF, 0xD8]));
        assert!(!is_valid_jpeg(&[0xFF, 0xD8, 0x00]));
        assert!(!is_valid_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
    }

    #[test]
    fn format_dispatches_to_its_own_signature() {
        let png = [0x89, 0x50, 0x4E, 0x47];
        let jpeg = [0xFF, 0xD8, 0xFF, 0xDB];
        assert!(ImageFormat::Png.matches(&png));
        assert!(!ImageFormat::Png.matches(&jpeg));
        assert!(ImageFormat::Jpeg.matches(&jpeg));
        assert!(!ImageFormat::Jpeg.matches(&png));
        assert_eq!(ImageFormat::Png.mime(), "image/png");
        assert_eq!(ImageFormat::Jpeg.mime(), "image/jpeg");
    }
}
