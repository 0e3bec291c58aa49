use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use notch_core::NotchPaths;

/// Send a command to the daemon via IPC
pub fn send_command(socket: &Path, cmd: &str) -> anyhow::Result<String> {
    if !socket.exists() {
        return Err(anyhow::anyhow!(
            "Notch shell daemon is not running (socket not found at {:?})",
            socket
        ));
    }

    let mut stream = UnixStream::connect(socket)?;
    stream.write_all(cmd.as_bytes())?;
    stream.write_all(b"\n")?;
    stream.flush()?;

    let mut response = String::new();
    stream.read_to_string(&mut response)?;

    Ok(response)
}

/// Send a command and print the daemon's answer; error answers fail the call
pub fn send_and_print(paths: &NotchPaths, cmd: &str) -> anyhow::Result<()> {
    let response = send_command(&paths.socket, cmd)?;
    let response = response.trim();
    if let Some(message) = response.strip_prefix("error: ") {
        anyhow::bail!("{}", message);
    }
    println!("{}", response);
    Ok(())
}
