//! Shutdown signal handling

use std::io;

use thiserror::Error;
use tokio::signal;

/// Failure to listen for a shutdown signal.
#[derive(Debug, Error)]
pub enum ShutdownSignalError {
    /// Ctrl+C handler could not be installed.
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    /// SIGTERM handler could not be installed.
    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

/// Wait for Ctrl+C or, on Unix, SIGTERM.
///
/// # Errors
///
/// Returns an error when a signal handler cannot be installed.
pub async fn wait() -> Result<(), ShutdownSignalError> {
    let ctrl_c = async { signal::ctrl_c().await.map_err(ShutdownSignalError::CtrlC) };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(ShutdownSignalError::SigTerm)?
            .recv()
            .await;
        Ok::<(), ShutdownSignalError>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<(), ShutdownSignalError>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            tracing::info!("ctrl_c signal received");
        }
        result = terminate => {
            result?;
            tracing::info!("terminate signal received");
        }
    };

    Ok(())
}
