//! Slideshow settings read from the environment.
//!
//! Every value has a default and every numeric value is clamped, so a
//! misconfigured environment still produces a usable slideshow.

use std::path::PathBuf;

use serde::Serialize;

use crate::resolve::SlideRequest;

pub const ENV_IMAGE_COUNT: &str = "SLIDESHOW_IMAGE_COUNT";
pub const ENV_BACKDROP_COLOR: &str = "SLIDESHOW_BACKDROP_COLOR";
pub const ENV_REFRESH_MS: &str = "SLIDESHOW_REFRESH_MS";
pub const ENV_EXTERNAL_DIR: &str = "SLIDESHOW_EXTERNAL_DIR";

pub const DEFAULT_IMAGE_COUNT: usize = 5;
pub const MIN_IMAGE_COUNT: usize = 1;
pub const MAX_IMAGE_COUNT: usize = 100;

pub const DEFAULT_BACKDROP_COLOR: &str = "#111111";

pub const DEFAULT_REFRESH_MS: u32 = 3000;
pub const MIN_REFRESH_MS: u32 = 250;
pub const MAX_REFRESH_MS: u32 = 60_000;

/// How the page looks, independent of which images it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    pub backdrop_color: String,
    pub refresh_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            backdrop_color: DEFAULT_BACKDROP_COLOR.to_string(),
            refresh_ms: DEFAULT_REFRESH_MS,
        }
    }
}

/// Everything one page render needs to know, captured once at request entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideshowConfig {
    pub image_count: usize,
    pub display: DisplayConfig,
    /// `None` means bundled images only.
    pub external_dir: Option<PathBuf>,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            image_count: DEFAULT_IMAGE_COUNT,
            display: DisplayConfig::default(),
            external_dir: None,
        }
    }
}

impl SlideshowConfig {
    /// Snapshot the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let image_count = parse_positive_int(
            lookup(ENV_IMAGE_COUNT).as_deref(),
            DEFAULT_IMAGE_COUNT as i64,
            MIN_IMAGE_COUNT as i64,
            MAX_IMAGE_COUNT as i64,
        ) as usize;
        let backdrop_color =
            default_if_blank(lookup(ENV_BACKDROP_COLOR).as_deref(), DEFAULT_BACKDROP_COLOR);
        let refresh_ms = parse_positive_int(
            lookup(ENV_REFRESH_MS).as_deref(),
            i64::from(DEFAULT_REFRESH_MS),
            i64::from(MIN_REFRESH_MS),
            i64::from(MAX_REFRESH_MS),
        ) as u32;
        let external_dir = non_blank(lookup(ENV_EXTERNAL_DIR).as_deref()).map(PathBuf::from);

        Self {
            image_count,
            display: DisplayConfig {
                backdrop_color,
                refresh_ms,
            },
            external_dir,
        }
    }

    #[must_use]
    pub fn slide_request(&self) -> SlideRequest {
        SlideRequest::new(self.image_count, self.external_dir.clone())
    }
}

/// Parse `raw` as an integer clamped into `[min, max]`.
///
/// Missing, blank and unparsable input all yield `default`, including
/// values that do not fit a 32-bit integer. Input is trimmed before parsing.
#[must_use]
pub fn parse_positive_int(raw: Option<&str>, default: i64, min: i64, max: i64) -> i64 {
    match non_blank(raw).map(str::parse::<i32>) {
        Some(Ok(value)) => i64::from(value).clamp(min, max),
        _ => default,
    }
}

/// Trimmed `raw`, or `default` when it is missing or whitespace only.
#[must_use]
pub fn default_if_blank(raw: Option<&str>, default: &str) -> String {
    non_blank(raw).unwrap_or(default).to_string()
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{default_if_blank, parse_positive_int};

    #[test]
    fn parse_falls_back_to_default() {
        assert_eq!(parse_positive_int(None, 5, 1, 10), 5);
        assert_eq!(parse_positive_int(Some(""), 5, 1, 10), 5);
        assert_eq!(parse_positive_int(Some("   "), 5, 1, 10), 5);
        assert_eq!(parse_positive_int(Some("not-a-number"), 5, 1, 10), 5);
        assert_eq!(parse_positive_int(Some("7.5"), 5, 1, 10), 5);
    }

    #[test]
    fn parse_rejects_values_beyond_32_bits() {
        assert_eq!(parse_positive_int(Some("3000000000"), 5, 1, 10), 5);
        assert_eq!(parse_positive_int(Some("-2147483649"), 5, 1, 10), 5);
        assert_eq!(parse_positive_int(Some("2147483647"), 5, 1, 10), 10);
        assert_eq!(parse_positive_int(Some("-2147483648"), 5, 1, 10), 1);
    }

    #[test]
    fn parse_clamps_into_range() {
        assert_eq!(parse_positive_int(Some("-10"), 5, 1, 10), 1);
        assert_eq!(parse_positive_int(Some("999"), 5, 1, 10), 10);
        assert_eq!(parse_positive_int(Some("7"), 5, 1, 10), 7);
        assert_eq!(parse_positive_int(Some(" 8 "), 5, 1, 10), 8);
        assert_eq!(parse_positive_int(Some("1"), 5, 1, 10), 1);
        assert_eq!(parse_positive_int(Some("10"), 5, 1, 10), 10);
    }

    #[test]
    fn blank_values_use_default() {
        assert_eq!(default_if_blank(None, "x"), "x");
        assert_eq!(default_if_blank(Some(""), "x"), "x");
        assert_eq!(default_if_blank(Some(" \t\n"), "x"), "x");
        assert_eq!(default_if_blank(Some("  abc  "), "x"), "abc");
    }
}
