use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notch-ctl")]
#[command(about = "Control utility for the notch shell")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the panel
    Open,
    /// Close the panel
    Close,
    /// Peek the closed panel
    PeekIn,
    /// End a peek
    PeekOut,
    /// Click on the panel
    Click,
    /// Signal a file drop onto the panel
    Drop,
    /// Feed one scroll sample
    Scroll {
        /// Positive pulls the panel down
        #[arg(allow_negative_numbers = true)]
        delta: f64,
        /// began, changed, ended or cancelled
        phase: String,
    },
    /// Feed one pointer sample
    Pointer {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Report now-playing artwork presence
    Artwork {
        /// on or off
        state: String,
    },
    /// Report whether the settings window is open
    SettingsWindow {
        /// open or closed
        state: String,
    },
    /// Report a named shortcut as held or released
    Shortcut {
        /// on or off
        state: String,
        /// Shortcut name, e.g. Hover Hide
        #[arg(trailing_var_arg = true, required = true)]
        name: Vec<String>,
    },
    /// Move the panel to a display
    Display {
        id: u32,
    },
    /// Reload configuration
    ReloadConfig,
    /// Show panel state
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cmd = match cli.command {
        Command::Open => "open".to_string(),
        Command::Close => "close".to_string(),
        Command::PeekIn => "peek-in".to_string(),
        Command::PeekOut => "peek-out".to_string(),
        Command::Click => "click".to_string(),
        Command::Drop => "drop".to_string(),
        Command::Scroll { delta, phase } => format!("scroll {} {}", delta, phase),
        Command::Pointer { x, y } => format!("pointer {} {}", x, y),
        Command::Artwork { state } => format!("artwork {}", state),
        Command::SettingsWindow { state } => format!("settings-window {}", state),
        Command::Shortcut { state, name } => format!("shortcut {} {}", name.join(" "), state),
        Command::Display { id } => format!("display {}", id),
        Command::ReloadConfig => "reload-config".to_string(),
        Command::Status => "status".to_string(),
    };

    let response = send_command(&cmd)?;
    println!("{}", response.trim());

    Ok(())
}

/// Get the IPC socket path
fn socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("notch-shell.sock")
}

/// Send a command to the daemon via IPC
fn send_command(cmd: &str) -> anyhow::Result<String> {
    let path = socket_path();

    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Notch shell daemon is not running (socket not found at {:?})",
            path
        ));
    }

    let mut stream = UnixStream::connect(&path)?;
    stream.write_all(cmd.as_bytes())?;
    stream.write_all(b"\n")?;
    stream.flush()?;

    let mut response = String::new();
    stream.read_to_string(&mut response)?;

    Ok(response)
}
