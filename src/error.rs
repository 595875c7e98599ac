use std::net::SocketAddr;

use thiserror::Error;

/// Library error type for the slideshow server.
///
/// Resolution itself never fails (absence is `None`); these cover the
/// process around it.
#[derive(Debug, Error)]
pub enum Error {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an I/O failure.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    RenderTask(#[from] tokio::task::JoinError),
}
