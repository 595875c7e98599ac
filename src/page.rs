//! The slideshow page model: resolved slides plus display settings.

use serde::Serialize;

use crate::config::{DisplayConfig, SlideshowConfig};
use crate::data_uri::TRANSPARENT_PIXEL;
use crate::resolve::{BundledImages, ResolvedSlide, resolve_slides};

/// Input to the HTML renderer. `images` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideshowPage {
    pub images: Vec<String>,
    pub backdrop_color: String,
    pub refresh_ms: u32,
}

impl SlideshowPage {
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// Combine resolved slides with display settings, substituting the
/// transparent pixel when nothing resolved.
#[must_use]
pub fn assemble(slides: Vec<ResolvedSlide>, display: &DisplayConfig) -> SlideshowPage {
    let mut images: Vec<String> = slides.into_iter().map(|slide| slide.data_uri).collect();
    if images.is_empty() {
        tracing::warn!("no slide images resolved; serving placeholder");
        images.push(TRANSPARENT_PIXEL.to_string());
    }
    SlideshowPage {
        images,
        backdrop_color: display.backdrop_color.clone(),
        refresh_ms: display.refresh_ms,
    }
}

/// One complete render pass: resolve every slide, then assemble.
pub fn build_page(config: &SlideshowConfig, bundled: &dyn BundledImages) -> SlideshowPage {
    let slides = resolve_slides(&config.slide_request(), bundled);
    assemble(slides, &config.display)
}
