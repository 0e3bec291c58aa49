use std::path::PathBuf;

use compact_str::CompactString;
use thiserror::Error;

/// Errors surfaced by the notch-core library
#[derive(Debug, Error)]
pub enum NotchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid command: {0}")]
    InvalidCommand(CompactString),

    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl NotchError {
    pub fn invalid_command(msg: impl Into<CompactString>) -> Self {
        Self::InvalidCommand(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, NotchError>;
