//! HTTP listener lifecycle.
//!
//! [`start_server`] is what the binary calls: bind the configured address
//! and serve until `Ctrl-C`. The two halves, [`bind`] and [`serve_until`],
//! are public so callers can bind an ephemeral port or supply their own
//! shutdown trigger.

use std::future::Future;
use std::sync::Arc;

use countries_core::config::ServerSettings;
use tokio::net::TcpListener;

use crate::router::build_router;
use crate::state::AppState;

/// Errors from binding or running the listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured host and port could not be bound.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        /// `host:port` as configured.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The accept loop failed.
    #[error("server stopped unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind a listener on `settings.host:settings.port`.
///
/// The host may be an IP literal or a resolvable name. Port `0` picks a
/// free port; read it back with [`TcpListener::local_addr`].
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address does not resolve or is in use.
pub async fn bind(settings: &ServerSettings) -> Result<TcpListener, ServerError> {
    TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", settings.host, settings.port),
            source,
        })
}

/// Serve the API on `listener` until `shutdown` resolves, then drain
/// in-flight requests.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] if the accept loop fails.
pub async fn serve_until<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Server listening");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Bind from configuration and serve until `Ctrl-C`.
///
/// # Errors
///
/// See [`bind`] and [`serve_until`].
pub async fn start_server(settings: &ServerSettings, state: Arc<AppState>) -> Result<(), ServerError> {
    let listener = bind(settings).await?;
    serve_until(listener, state, ctrl_c()).await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable; shutting down");
    }
}
