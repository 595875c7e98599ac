use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SlideshowConfig;
use crate::error::Error;
use crate::health::{HealthCheck, HealthReport, liveness, readiness};
use crate::page::{SlideshowPage, build_page};
use crate::resolve::{BundledImages, EmbeddedImages};

/// Where each request gets its slideshow settings from.
#[derive(Clone)]
pub enum ConfigSource {
    /// Re-read the process environment on every request.
    Environment,
    Fixed(Arc<SlideshowConfig>),
}

impl ConfigSource {
    #[must_use]
    pub fn load(&self) -> SlideshowConfig {
        match self {
            Self::Environment => SlideshowConfig::from_env(),
            Self::Fixed(config) => config.as_ref().clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    config: ConfigSource,
    bundled: Arc<dyn BundledImages>,
}

impl AppState {
    pub fn new(config: ConfigSource, bundled: Arc<dyn BundledImages>) -> Self {
        Self { config, bundled }
    }

    /// Environment-driven settings with the embedded fallback images.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ConfigSource::Environment, Arc::new(EmbeddedImages))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(slideshow))
        .route("/q/health", get(health_all))
        .route("/q/health/live", get(health_live))
        .route("/q/health/ready", get(health_ready))
        .with_state(state)
}

/// Bind `bind_addr` and serve until `cancel` fires.
pub async fn serve(
    state: AppState,
    bind_addr: SocketAddr,
    cancel: CancellationToken,
) -> Result<(), Error> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|source| Error::Bind {
            addr: bind_addr,
            source,
        })?;
    info!(%bind_addr, "slideshow server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .map_err(Error::Serve)?;
    info!("slideshow server stopped");
    Ok(())
}

/// Cancel `cancel` on Ctrl-C or SIGTERM.
pub async fn shutdown_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut term) = signal(SignalKind::terminate()) {
            term.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown requested");
    cancel.cancel();
}

async fn slideshow(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let config = state.config.load();
    debug!(?config, "rendering slideshow");
    let bundled = Arc::clone(&state.bundled);
    let page = tokio::task::spawn_blocking(move || build_page(&config, bundled.as_ref()))
        .await
        .map_err(|err| internal_error("failed to render slideshow")(err.into()))?;
    Ok(Html(render_page(&page)))
}

async fn health_live() -> Response {
    health_response(HealthReport::from_checks(vec![liveness()]))
}

async fn health_ready(
    State(state): State<AppState>,
) -> Result<Response, (StatusCode, Html<String>)> {
    let check = readiness_check(&state)
        .await
        .map_err(internal_error("failed to run readiness check"))?;
    Ok(health_response(HealthReport::from_checks(vec![check])))
}

async fn health_all(
    State(state): State<AppState>,
) -> Result<Response, (StatusCode, Html<String>)> {
    let check = readiness_check(&state)
        .await
        .map_err(internal_error("failed to run readiness check"))?;
    Ok(health_response(HealthReport::from_checks(vec![liveness(), check])))
}

async fn readiness_check(state: &AppState) -> Result<HealthCheck, Error> {
    let external_dir = state.config.load().external_dir;
    let bundled = Arc::clone(&state.bundled);
    let check =
        tokio::task::spawn_blocking(move || readiness(external_dir.as_deref(), bundled.as_ref()))
            .await?;
    Ok(check)
}

fn health_response(report: HealthReport) -> Response {
    let code = if report.status.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report)).into_response()
}

fn internal_error(msg: &'static str) -> impl Fn(Error) -> (StatusCode, Html<String>) {
    move |err| {
        tracing::error!(error = %err, "{msg}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Slideshow</title></head><body><h2>Something went wrong</h2><p>{msg}</p></body></html>"
            )),
        )
    }
}

/// Render the slideshow markup. Every slide is inlined; the first one is
/// visible and a small script rotates through the rest.
pub fn render_page(page: &SlideshowPage) -> String {
    let count = page.image_count();
    let mut body = String::new();
    body.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>Slideshow</title><style>");
    body.push_str(styles());
    body.push_str("</style></head>");
    writeln!(
        &mut body,
        "<body style=\"background-color: {}\"><main class=\"stage\">",
        escape_html(&page.backdrop_color)
    )
    .ok();
    for (index, uri) in page.images.iter().enumerate() {
        let class = if index == 0 { "slide active" } else { "slide" };
        // Base64 payloads carry no markup characters.
        writeln!(
            &mut body,
            "<img class=\"{class}\" src=\"{uri}\" alt=\"Slide {}\">",
            index + 1
        )
        .ok();
    }
    body.push_str("</main>");
    writeln!(
        &mut body,
        "<p class=\"meta\">{count} {} &bull; {} ms</p>",
        if count == 1 { "image" } else { "images" },
        page.refresh_ms
    )
    .ok();
    writeln!(
        &mut body,
        "<script>(function(){{var s=document.querySelectorAll('.slide');if(s.length<2)return;var i=0;setInterval(function(){{s[i].classList.remove('active');i=(i+1)%s.length;s[i].classList.add('active');}},{});}})();</script>",
        page.refresh_ms
    )
    .ok();
    body.push_str("</body></html>");
    body
}

fn styles() -> &'static str {
    "html, body { margin: 0; height: 100%; overflow: hidden; }\nbody { font-family: sans-serif; color: #ddd; }\n.stage { position: fixed; inset: 0; }\n.slide { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: contain; opacity: 0; transition: opacity 0.6s ease-in-out; }\n.slide.active { opacity: 1; }\n.meta { position: fixed; right: 12px; bottom: 8px; margin: 0; font-size: 0.8rem; opacity: 0.6; }"
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
