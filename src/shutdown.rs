use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Install a shutdown handler for SIGTERM and ctrl-c.
///
/// Returns a `CancellationToken` that is cancelled when either arrives.
/// The HTTP server waits on it and drains in-flight requests before
/// exiting; pending client actions simply see their last response.
pub fn install_shutdown_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, draining requests");
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "ctrl-c handler failed, shutting down");
                } else {
                    tracing::info!("Received ctrl-c, draining requests");
                }
            }
        }

        token_clone.cancel();
    });

    token
}
