// src/engine/signals.rs

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::engine::RuntimeEvent;

/// Turn SIGTERM / SIGINT into a `ShutdownRequested` event.
///
/// Cleanup then happens in the runtime loop, not in signal context.
pub fn spawn_signal_listener(tx: mpsc::Sender<RuntimeEvent>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sig) => sig,
                Err(e) => {
                    error!(error = %e, "failed to listen for SIGTERM");
                    return;
                }
            };

            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        error!(error = %e, "failed to listen for SIGINT");
                        return;
                    }
                    debug!("received SIGINT");
                }
                _ = sigterm.recv() => debug!("received SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
        }

        let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
    });
}
