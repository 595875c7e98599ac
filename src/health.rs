//! Liveness and readiness reports in the MicroProfile Health JSON shape.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;

use crate::resolve::{
    BundledImages, SlideRequest, bundled_image_exists, external_image_exists, resolve_slides,
};

pub const LIVENESS_CHECK: &str = "app-liveness";
pub const READINESS_CHECK: &str = "slideshow-readiness";

/// Shown in place of the external directory when none is configured.
pub const NO_EXTERNAL_DIR: &str = "(none)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    #[must_use]
    pub fn from_up(up: bool) -> Self {
        if up { Self::Up } else { Self::Down }
    }

    #[must_use]
    pub fn is_up(self) -> bool {
        self == Self::Up
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Aggregate of one or more checks; `Down` if any check is down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    #[must_use]
    pub fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = HealthStatus::from_up(checks.iter().all(|check| check.status.is_up()));
        Self { status, checks }
    }
}

/// What the readiness check found for the first slide.
///
/// The `*_has_image` flags report presence only; a corrupt file still
/// counts, so operators can spot it. `resolvable` is the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSlideProbe {
    pub external_dir: Option<PathBuf>,
    pub external_has_image: bool,
    pub bundled_has_image: bool,
    pub resolvable: bool,
}

/// Look for slide 0 with the same resolver the page uses.
pub fn probe_first_slide(
    external_dir: Option<&Path>,
    bundled: &dyn BundledImages,
) -> FirstSlideProbe {
    let request = SlideRequest::new(1, external_dir.map(Path::to_path_buf));
    let resolvable = !resolve_slides(&request, bundled).is_empty();
    FirstSlideProbe {
        external_dir: external_dir.map(Path::to_path_buf),
        external_has_image: external_dir.is_some_and(|dir| external_image_exists(dir, 0)),
        bundled_has_image: bundled_image_exists(bundled, 0),
        resolvable,
    }
}

/// Always up while the process can answer.
#[must_use]
pub fn liveness() -> HealthCheck {
    HealthCheck {
        name: LIVENESS_CHECK,
        status: HealthStatus::Up,
        data: None,
    }
}

pub fn readiness(external_dir: Option<&Path>, bundled: &dyn BundledImages) -> HealthCheck {
    let probe = probe_first_slide(external_dir, bundled);
    let external_dir = probe
        .external_dir
        .as_ref()
        .map_or_else(|| NO_EXTERNAL_DIR.to_string(), |dir| dir.display().to_string());
    HealthCheck {
        name: READINESS_CHECK,
        status: HealthStatus::from_up(probe.resolvable),
        data: Some(json!({
            "externalDir": external_dir,
            "externalHasImg": probe.external_has_image,
            "classpathHasImg": probe.bundled_has_image,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::{HealthReport, HealthStatus, liveness, probe_first_slide, readiness};
    use crate::resolve::{BundledImages, EmbeddedImages};
    use std::borrow::Cow;

    struct NoImages;

    impl BundledImages for NoImages {
        fn load(&self, _name: &str) -> Option<Cow<'static, [u8]>> {
            None
        }
    }

    #[test]
    fn liveness_is_always_up() {
        let report = HealthReport::from_checks(vec![liveness()]);
        assert_eq!(report.status, HealthStatus::Up);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["status"], "UP");
        assert_eq!(json["checks"][0]["name"], "app-liveness");
        assert!(json["checks"][0].get("data").is_none());
    }

    #[test]
    fn readiness_reports_bundled_first_slide() {
        let check = readiness(None, &EmbeddedImages);
        assert_eq!(check.status, HealthStatus::Up);
        let data = check.data.expect("readiness data");
        assert_eq!(data["externalDir"], "(none)");
        assert_eq!(data["externalHasImg"], false);
        assert_eq!(data["classpathHasImg"], true);
    }

    #[test]
    fn corrupt_external_image_is_present_but_not_ready() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("img.png"), b"not a png").expect("write");

        let probe = probe_first_slide(Some(tmp.path()), &NoImages);
        assert!(probe.external_has_image);
        assert!(!probe.bundled_has_image);
        assert!(!probe.resolvable);

        let check = readiness(Some(tmp.path()), &NoImages);
        assert_eq!(check.status, HealthStatus::Down);
        assert_eq!(check.data.expect("readiness data")["externalHasImg"], true);
    }

    #[test]
    fn readiness_is_down_without_any_image() {
        let check = readiness(None, &NoImages);
        assert_eq!(check.status, HealthStatus::Down);
        let report = HealthReport::from_checks(vec![liveness(), check]);
        assert_eq!(report.status, HealthStatus::Down);
    }
}
