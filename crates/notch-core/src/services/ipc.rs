use std::path::PathBuf;
use std::time::Duration;

use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::messages::{NotchCommand, NotchEvent};

const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Line-based command socket; one command and one response per connection
pub struct IpcServer {
    socket: PathBuf,
    event_tx: Sender<NotchEvent>,
}

impl IpcServer {
    pub fn new(socket: PathBuf, event_tx: Sender<NotchEvent>) -> Self {
        Self { socket, event_tx }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        // A stale socket from a crashed daemon blocks bind
        if self.socket.exists() {
            tokio::fs::remove_file(&self.socket).await?;
        }
        let listener = UnixListener::bind(&self.socket)?;
        info!("IPC listening on {:?}", self.socket);

        loop {
            let (stream, _) = listener.accept().await?;
            let event_tx = self.event_tx.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, event_tx).await {
                    debug!("IPC connection error: {}", e);
                }
            });
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket);
    }
}

async fn handle_connection(stream: UnixStream, event_tx: Sender<NotchEvent>) -> anyhow::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let response = respond(line.trim(), &event_tx).await;
    write_half.write_all(response.as_bytes()).await?;
    write_half.write_all(b"\n").await?;
    write_half.shutdown().await?;
    Ok(())
}

/// Parse a line, hand it to the UI thread and wait for its answer
pub async fn respond(line: &str, event_tx: &Sender<NotchEvent>) -> String {
    let command = match NotchCommand::parse(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("Rejected IPC command {:?}: {}", line, e);
            return format!("error: {}", e);
        }
    };
    debug!("IPC command: {}", command);

    let (reply_tx, reply_rx) = oneshot::channel();
    let event = NotchEvent::Command {
        command,
        reply: Some(reply_tx),
    };
    if event_tx.send(event).await.is_err() {
        return "error: daemon is shutting down".to_string();
    }

    match tokio::time::timeout(REPLY_TIMEOUT, reply_rx).await {
        Ok(Ok(response)) => response,
        Ok(Err(_)) => "ok".to_string(),
        Err(_) => "error: timed out waiting for the panel".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_lines_are_answered_locally() {
        let (tx, rx) = async_channel::bounded(4);
        let response = respond("wiggle", &tx).await;
        assert!(response.starts_with("error:"));
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn commands_are_forwarded_with_a_reply_channel() {
        let (tx, rx) = async_channel::bounded(4);
        let ui = tokio::spawn(async move {
            match rx.recv().await {
                Ok(NotchEvent::Command { command, reply }) => {
                    assert_eq!(command, NotchCommand::Status);
                    if let Some(reply) = reply {
                        let _ = reply.send("state=closed".to_string());
                    }
                }
                other => panic!("unexpected event {:?}", other),
            }
        });

        assert_eq!(respond("status", &tx).await, "state=closed");
        ui.await.unwrap();
    }
}
