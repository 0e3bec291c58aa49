use std::path::{Path, PathBuf};

const SOCKET_NAME: &str = "notch-shell.sock";

/// Filesystem locations used by the notch shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotchPaths {
    pub settings: PathBuf,
    pub socket: PathBuf,
}

impl NotchPaths {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp"));

        Self {
            settings: config_dir.join("notch-shell/settings.json"),
            socket: runtime_dir.join(SOCKET_NAME),
        }
    }

    /// Paths rooted in a single directory, used by tests and `--config-dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            settings: dir.join("settings.json"),
            socket: dir.join(SOCKET_NAME),
        }
    }

    /// Directory holding the settings file
    pub fn config_dir(&self) -> PathBuf {
        self.settings
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for NotchPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_keeps_everything_together() {
        let paths = NotchPaths::in_dir("/var/empty/notch");
        assert_eq!(paths.settings, PathBuf::from("/var/empty/notch/settings.json"));
        assert_eq!(paths.socket, PathBuf::from("/var/empty/notch/notch-shell.sock"));
        assert_eq!(paths.config_dir(), PathBuf::from("/var/empty/notch"));
    }
}
