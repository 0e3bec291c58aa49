use tokio::sync::oneshot;

use crate::config::NotchSettings;
use super::NotchCommand;

/// Response channel for a command that expects an answer
pub type Reply = oneshot::Sender<String>;

/// Events FROM services TO the UI thread
#[derive(Debug)]
pub enum NotchEvent {
    /// Settings file changed on disk
    SettingsReloaded(Box<NotchSettings>),

    /// A command arrived over IPC
    Command {
        command: NotchCommand,
        reply: Option<Reply>,
    },

    /// Services are going away
    Shutdown,
}
