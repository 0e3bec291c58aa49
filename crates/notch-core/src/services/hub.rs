use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::config::NotchPaths;
use crate::messages::NotchEvent;
use super::{ConfigWatcher, IpcServer};

/// Owns the service runtime and the channel into the UI thread
pub struct ServiceHub {
    /// Event sender for services
    event_tx: async_channel::Sender<NotchEvent>,
    /// Event receiver for the UI thread
    event_rx: async_channel::Receiver<NotchEvent>,
    runtime: Arc<Runtime>,
}

impl ServiceHub {
    /// Create the hub, start its runtime and spawn the services
    pub fn new(paths: NotchPaths) -> anyhow::Result<Self> {
        let runtime = Arc::new(Runtime::new()?);
        let (event_tx, event_rx) = async_channel::bounded::<NotchEvent>(64);

        let event_tx_config = event_tx.clone();
        let watcher_paths = paths.clone();
        runtime.spawn(async move {
            let watcher = ConfigWatcher::new(watcher_paths, event_tx_config);
            if let Err(e) = watcher.run().await {
                error!("Config watcher error: {}", e);
            }
        });

        let event_tx_ipc = event_tx.clone();
        let socket = paths.socket.clone();
        runtime.spawn(async move {
            let server = IpcServer::new(socket, event_tx_ipc);
            if let Err(e) = server.run().await {
                error!("IPC server error: {}", e);
            }
        });

        info!("ServiceHub initialized");

        Ok(Self {
            event_tx,
            event_rx,
            runtime,
        })
    }

    pub fn event_receiver(&self) -> async_channel::Receiver<NotchEvent> {
        self.event_rx.clone()
    }

    pub fn event_sender(&self) -> async_channel::Sender<NotchEvent> {
        self.event_tx.clone()
    }

    /// Enter the runtime context
    pub fn enter_runtime(&self) -> tokio::runtime::EnterGuard<'_> {
        self.runtime.enter()
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    /// Broadcast an event from a non-async context
    pub fn broadcast_event(&self, event: NotchEvent) {
        let _ = self.event_tx.send_blocking(event);
    }
}
