//! Slide image resolution.
//!
//! Each slide index maps to a base name (`img`, `img_1`, `img_2`, ...). The
//! operator's external directory is searched first, by extension priority,
//! and the images compiled into the binary are the fallback. A candidate is
//! only accepted once its bytes carry the signature of the format its
//! extension claims; anything missing, unreadable or mislabelled is skipped.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use tracing::{debug, trace};

use crate::data_uri;
use crate::sniff::ImageFormat;

/// Read-only access to the fallback image set.
pub trait BundledImages: Send + Sync {
    /// Raw bytes of the bundled file `name` (e.g. `img_3.png`), if shipped.
    fn load(&self, name: &str) -> Option<Cow<'static, [u8]>>;
}

/// Images under `assets/slideshow-images/`, embedded at build time.
#[derive(RustEmbed)]
#[folder = "assets/slideshow-images/"]
pub struct EmbeddedImages;

impl BundledImages for EmbeddedImages {
    fn load(&self, name: &str) -> Option<Cow<'static, [u8]>> {
        <Self as RustEmbed>::get(name).map(|file| file.data)
    }
}

/// Where a slide's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideOrigin {
    External,
    Bundled,
}

impl fmt::Display for SlideOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::External => "external",
            Self::Bundled => "bundled",
        })
    }
}

/// Lookup priority for a single slide. First validated hit wins.
const LOOKUP_ORDER: &[(SlideOrigin, &str, ImageFormat)] = &[
    (SlideOrigin::External, "png", ImageFormat::Png),
    (SlideOrigin::External, "jpg", ImageFormat::Jpeg),
    (SlideOrigin::External, "jpeg", ImageFormat::Jpeg),
    (SlideOrigin::Bundled, "png", ImageFormat::Png),
];

/// How many slides to resolve and where to look first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRequest {
    count: usize,
    external_dir: Option<PathBuf>,
}

impl SlideRequest {
    /// `count` is raised to at least one slide.
    #[must_use]
    pub fn new(count: usize, external_dir: Option<PathBuf>) -> Self {
        Self {
            count: count.max(1),
            external_dir,
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn external_dir(&self) -> Option<&Path> {
        self.external_dir.as_deref()
    }
}

/// Bytes that passed validation for one slide index.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub bytes: Cow<'static, [u8]>,
    pub format: ImageFormat,
    pub origin: SlideOrigin,
}

impl ImageCandidate {
    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    #[must_use]
    pub fn to_data_uri(&self) -> String {
        data_uri::encode(&self.bytes, self.mime())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlide {
    pub index: usize,
    pub origin: SlideOrigin,
    pub data_uri: String,
}

/// Base file name (without extension) for slide `index`.
#[must_use]
pub fn base_name(index: usize) -> String {
    if index == 0 {
        "img".to_string()
    } else {
        format!("img_{index}")
    }
}

/// Resolve slides `0..request.count()` in order.
///
/// Indices with no usable image are left out, so the result may be shorter
/// than requested, or empty.
pub fn resolve_slides(
    request: &SlideRequest,
    bundled: &dyn BundledImages,
) -> Vec<ResolvedSlide> {
    let slides: Vec<ResolvedSlide> = (0..request.count())
        .filter_map(|index| {
            let candidate = resolve_index(request.external_dir(), bundled, index)?;
            Some(ResolvedSlide {
                index,
                origin: candidate.origin,
                data_uri: candidate.to_data_uri(),
            })
        })
        .collect();
    debug!(
        requested = request.count(),
        resolved = slides.len(),
        external_dir = ?request.external_dir(),
        "resolved slides"
    );
    slides
}

/// Full external-then-bundled lookup for one slide.
pub fn resolve_index(
    external_dir: Option<&Path>,
    bundled: &dyn BundledImages,
    index: usize,
) -> Option<ImageCandidate> {
    lookup(external_dir, Some(bundled), index)
}

/// External directory only.
pub fn lookup_external(dir: &Path, index: usize) -> Option<ImageCandidate> {
    lookup(Some(dir), None, index)
}

/// Bundled set only.
pub fn lookup_bundled(bundled: &dyn BundledImages, index: usize) -> Option<ImageCandidate> {
    lookup(None, Some(bundled), index)
}

/// Whether any `img*.{png,jpg,jpeg}` file for `index` is present in `dir`,
/// valid or not.
pub fn external_image_exists(dir: &Path, index: usize) -> bool {
    let base = base_name(index);
    LOOKUP_ORDER
        .iter()
        .filter(|(origin, ..)| *origin == SlideOrigin::External)
        .any(|(_, ext, _)| dir.join(format!("{base}.{ext}")).is_file())
}

/// Whether the bundled set ships a file for `index`, valid or not.
pub fn bundled_image_exists(bundled: &dyn BundledImages, index: usize) -> bool {
    let base = base_name(index);
    LOOKUP_ORDER
        .iter()
        .filter(|(origin, ..)| *origin == SlideOrigin::Bundled)
        .any(|(_, ext, _)| bundled.load(&format!("{base}.{ext}")).is_some())
}

fn lookup(
    external_dir: Option<&Path>,
    bundled: Option<&dyn BundledImages>,
    index: usize,
) -> Option<ImageCandidate> {
    let base = base_name(index);
    LOOKUP_ORDER.iter().find_map(|&(origin, ext, format)| {
        let file = format!("{base}.{ext}");
        let bytes: Cow<'static, [u8]> = match origin {
            SlideOrigin::External => read_regular_file(&external_dir?.join(&file))?.into(),
            SlideOrigin::Bundled => match bundled?.load(&file) {
                Some(bytes) => bytes,
                None => {
                    trace!(%file, "no bundled image");
                    return None;
                }
            },
        };
        accept(bytes, format, origin, &file)
    })
}

fn accept(
    bytes: Cow<'static, [u8]>,
    format: ImageFormat,
    origin: SlideOrigin,
    file: &str,
) -> Option<ImageCandidate> {
    if bytes.is_empty() {
        debug!(%origin, file, "skipping empty slide image");
        return None;
    }
    if !format.matches(&bytes) {
        debug!(
            %origin,
            file,
            expected = %format,
            "skipping slide image with wrong signature"
        );
        return None;
    }
    trace!(%origin, file, len = bytes.len(), "accepted slide image");
    Some(ImageCandidate {
        bytes,
        format,
        origin,
    })
}

fn read_regular_file(path: &Path) -> Option<Vec<u8>> {
    // Only plain files: reading a FIFO or device would block the render.
    if !path.is_file() {
        trace!(path = %path.display(), "no external image");
        return None;
    }
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "failed to read external image");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BundledImages, EmbeddedImages, SlideRequest, base_name, bundled_image_exists,
        external_image_exists, lookup_bundled, lookup_external,
    };
    use std::borrow::Cow;

    struct NoImages;

    impl BundledImages for NoImages {
        fn load(&self, _name: &str) -> Option<Cow<'static, [u8]>> {
            None
        }
    }

    #[test]
    fn base_names_follow_index() {
        assert_eq!(base_name(0), "img");
        assert_eq!(base_name(1), "img_1");
        assert_eq!(base_name(42), "img_42");
    }

    #[test]
    fn request_keeps_at_least_one_slide() {
        assert_eq!(SlideRequest::new(0, None).count(), 1);
        assert_eq!(SlideRequest::new(7, None).count(), 7);
    }

    #[test]
    fn embedded_set_ships_default_slides() {
        for index in 0..5 {
            let candidate = lookup_bundled(&EmbeddedImages, index)
                .unwrap_or_else(|| panic!("bundled slide {index} missing"));
            assert_eq!(candidate.mime(), "image/png");
        }
    }

    #[test]
    fn empty_bundle_resolves_nothing() {
        assert!(lookup_bundled(&NoImages, 0).is_none());
    }

    #[test]
    fn existence_ignores_signature() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(!external_image_exists(tmp.path(), 0));

        std::fs::write(tmp.path().join("img.jpeg"), b"garbage").expect("write");
        assert!(external_image_exists(tmp.path(), 0));
        assert!(lookup_external(tmp.path(), 0).is_none());
        assert!(!external_image_exists(tmp.path(), 1));

        assert!(bundled_image_exists(&EmbeddedImages, 0));
        assert!(!bundled_image_exists(&NoImages, 0));
    }
}
