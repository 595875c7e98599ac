use std::sync::Once;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Map `-v` occurrences to the crate's log level.
#[must_use]
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` is honored; the verbosity only raises this crate's directive.
pub fn init(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("slideshow_server={}", level_for(verbosity)).parse()?)
        .add_directive("hyper=warn".parse()?);
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .init();
    });
    Ok(())
}
