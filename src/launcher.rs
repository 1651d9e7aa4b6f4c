use std::io::ErrorKind;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{Error, Result};
use crate::models::Connection;

/// Spawn the system ssh client for a resolved connection and wait for it
/// to exit.
///
/// The child inherits this process's stdio, so an interactive session owns
/// the terminal until the user disconnects. A missing ssh executable is
/// reported as an error for the caller to handle, and a non-zero exit comes
/// back as a normal status.
pub fn launch(connection: &Connection) -> Result<ExitStatus> {
    run("ssh", connection)
}

fn run(program: &str, connection: &Connection) -> Result<ExitStatus> {
    let target = format!("{}@{}", connection.username, connection.host);

    tracing::info!(
        "launching: {} {} -p {} -i {}",
        program,
        target,
        connection.port,
        connection.ssh_key
    );

    let status = Command::new(program)
        .arg(&target)
        .arg("-p")
        .arg(connection.port.to_string())
        .arg("-i")
        .arg(&connection.ssh_key)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::SshNotFound
            } else {
                Error::Io(e)
            }
        })?;

    if status.success() {
        tracing::info!("ssh session ended normally");
    } else {
        tracing::error!("ssh exited with {}", status);
    }
    Ok(status)
}
