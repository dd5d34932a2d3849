//! Stops the proxy listener on SIGINT/SIGTERM. Requests already being relayed
//! to an OCSP responder or CRL host are allowed to complete.

use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver handed to [`crate::ProxyServer::serve`].
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub async fn wait_for_signal(&self) {
        let name = termination_signal().await;
        info!(signal = name, "stopping revocation proxy");
        self.stop();
    }

    fn stop(&self) {
        // No receivers means the server already exited.
        let _ = self.tx.send(());
    }
}

async fn termination_signal() -> &'static str {
    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable, relying on SIGINT: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => "SIGINT",
        _ = sigterm => "SIGTERM",
    }
}
