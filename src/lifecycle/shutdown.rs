//! Stopping the relay: an in-process trigger or a process signal, whichever
//! comes first, ends `HttpServer::run` once in-flight submissions finish.

use tokio::sync::broadcast;

/// Handle that stops a running relay.
///
/// `startup::run` keeps one for the process; tests keep one per spawned relay
/// and fire it when the case ends.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every relay subscribed to this handle. A no-op when none is.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve when a shutdown is triggered or the process is asked to stop.
pub async fn shutdown_signal(mut trigger: broadcast::Receiver<()>) {
    tokio::select! {
        _ = trigger.recv() => tracing::info!("Shutdown triggered"),
        _ = crate::lifecycle::signals::terminate() => tracing::info!("Shutdown signal received"),
    }
}
