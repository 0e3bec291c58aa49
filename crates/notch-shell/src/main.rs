mod daemon;
mod headless;
mod ipc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use notch_core::NotchPaths;

#[derive(Parser)]
#[command(name = "notch-shell")]
#[command(about = "Notch overlay panel daemon")]
#[command(version)]
struct Cli {
    /// Keep settings and socket in this directory instead of the defaults
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run as daemon (default)
    Daemon,
    /// Open the panel
    Open,
    /// Close the panel
    Close,
    /// Peek the closed panel
    PeekIn,
    /// End a peek
    PeekOut,
    /// Reload configuration
    ReloadConfig,
    /// Show panel state
    Status,
    /// Send a raw command line (e.g. "scroll 260 began")
    Send {
        #[arg(trailing_var_arg = true, required = true)]
        words: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notch_shell=info".parse()?)
                .add_directive("notch_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let paths = match cli.config_dir {
        Some(dir) => NotchPaths::in_dir(dir),
        None => NotchPaths::new(),
    };

    match cli.command {
        Some(Command::Daemon) | None => {
            info!("Starting notch shell daemon");
            daemon::run(paths)
        }
        Some(Command::Open) => ipc::send_and_print(&paths, "open"),
        Some(Command::Close) => ipc::send_and_print(&paths, "close"),
        Some(Command::PeekIn) => ipc::send_and_print(&paths, "peek-in"),
        Some(Command::PeekOut) => ipc::send_and_print(&paths, "peek-out"),
        Some(Command::ReloadConfig) => ipc::send_and_print(&paths, "reload-config"),
        Some(Command::Status) => ipc::send_and_print(&paths, "status"),
        Some(Command::Send { words }) => ipc::send_and_print(&paths, &words.join(" ")),
    }
}
