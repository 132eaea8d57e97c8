//! Line-based control protocol spoken over the daemon's Unix socket.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/lucky.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ControlCommand {
    Show,
    Hide,
    Spread,
    Reset,
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Failed to connect to lucky daemon at {path}: {source}. Is lucky running?")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses one protocol line; surrounding whitespace is ignored.
pub fn parse_line(line: &str) -> Option<ControlCommand> {
    line.trim().parse().ok()
}

pub fn send(command: ControlCommand) -> Result<(), ControlError> {
    send_to(SOCKET_PATH, command)
}

pub fn send_to(path: impl Into<PathBuf>, command: ControlCommand) -> Result<(), ControlError> {
    let path = path.into();
    let mut stream = UnixStream::connect(&path).map_err(|source| ControlError::Connect {
        path: path.clone(),
        source,
    })?;
    writeln!(stream, "{}", command)?;
    Ok(())
}
