//! Self-contained HTML slideshow server.
//!
//! Slides come from an optional external directory, falling back to images
//! embedded in the binary; every image is sniffed for a PNG or JPEG
//! signature and inlined into the page as a `data:` URI.

pub mod config;
pub mod data_uri;
pub mod error;
pub mod health;
pub mod logging;
pub mod page;
pub mod resolve;
pub mod sniff;
pub mod web;

pub use config::{DisplayConfig, SlideshowConfig};
pub use error::Error;
pub use page::{SlideshowPage, build_page};
pub use resolve::{BundledImages, EmbeddedImages, ResolvedSlide, SlideRequest, resolve_slides};
