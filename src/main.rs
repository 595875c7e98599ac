//! Binary entrypoint for the slideshow server.
//!
//! Parses the command line, installs logging and hands off to the library.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use slideshow_server::web::{self, AppState};
use slideshow_server::{SlideshowConfig, logging};

#[derive(Debug, Parser)]
#[command(
    name = "slideshow-server",
    version,
    about = "Serve a self-contained HTML slideshow"
)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, value_name = "ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    if let Err(err) = try_main().await {
        error!(error = ?err, "slideshow-server exited with error");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose).context("initializing logging")?;

    // Settings are re-read per request; this snapshot is only for the log.
    let startup = SlideshowConfig::from_env();
    info!(
        bind = %cli.bind,
        image_count = startup.image_count,
        refresh_ms = startup.display.refresh_ms,
        external_dir = ?startup.external_dir,
        "starting slideshow-server"
    );

    let cancel = CancellationToken::new();
    tokio::spawn(web::shutdown_on_signal(cancel.clone()));

    web::serve(AppState::from_env(), cli.bind, cancel)
        .await
        .with_context(|| format!("serving on {}", cli.bind))?;
    Ok(())
}
