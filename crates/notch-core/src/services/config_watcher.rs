use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{NotchPaths, NotchSettings};
use crate::messages::NotchEvent;

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches the settings file and publishes reloaded settings
pub struct ConfigWatcher {
    paths: NotchPaths,
    event_tx: Sender<NotchEvent>,
}

impl ConfigWatcher {
    pub fn new(paths: NotchPaths, event_tx: Sender<NotchEvent>) -> Self {
        Self { paths, event_tx }
    }

    /// Run the watcher until the event channel closes
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting config watcher");

        let config_dir = self.paths.config_dir();
        tokio::fs::create_dir_all(&config_dir).await?;

        let (notify_tx, mut notify_rx) = mpsc::channel::<PathBuf>(32);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    // Editors often save by rename, which shows up as a create
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        for path in event.paths {
                            let _ = notify_tx.blocking_send(path);
                        }
                    }
                }
            },
            notify::Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Watch the directory since the file might not exist yet
        watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
        debug!("Watching directory: {:?}", config_dir);

        let mut debounce_deadline: Option<tokio::time::Instant> = None;

        loop {
            tokio::select! {
                changed = notify_rx.recv() => match changed {
                    Some(path) if path == self.paths.settings => {
                        debounce_deadline = Some(tokio::time::Instant::now() + DEBOUNCE);
                    }
                    Some(_) => {}
                    None => break,
                },

                _ = async {
                    if let Some(deadline) = debounce_deadline {
                        tokio::time::sleep_until(deadline).await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    debounce_deadline = None;
                    if !self.reload_settings().await {
                        break;
                    }
                }
            }
        }

        info!("Config watcher stopped");
        Ok(())
    }

    /// Reload settings and send them on. Returns false once nobody listens.
    async fn reload_settings(&self) -> bool {
        debug!("Reloading settings: {:?}", self.paths.settings);

        match tokio::fs::read(&self.paths.settings).await {
            Ok(data) => match serde_json::from_slice::<NotchSettings>(&data) {
                Ok(settings) => {
                    info!(
                        "Settings reloaded, opening animation {:?}, {} display(s)",
                        settings.opening_animation(),
                        settings.displays.len()
                    );
                    self.event_tx
                        .send(NotchEvent::SettingsReloaded(Box::new(settings)))
                        .await
                        .is_ok()
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}", e);
                    true
                }
            },
            Err(e) => {
                debug!("Could not read settings: {}", e);
                true
            }
        }
    }
}
