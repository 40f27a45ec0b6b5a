use std::fmt::{self, Debug, Display};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing file or URL")]
    MissingArgument,
    #[error("{}: {source}", path.display())]
    NotFound { path: PathBuf, source: io::Error },
    #[error("Cannot serve '{target}': {reason}")]
    InvalidTarget {
        target: String,
        reason: &'static str,
    },
    #[error("Failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Failed to listen on port {port}: {source}")]
    ListenFailure { port: u16, source: io::Error },
    #[error("Shutdown did not complete within {0:?}")]
    ShutdownFailure(Duration),
}

pub struct DisplayError(Error);

impl Debug for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T: Into<Error>> From<T> for DisplayError {
    fn from(display: T) -> Self {
        DisplayError(display.into())
    }
}

pub trait IoErrorExt {
    fn applies_to(&self) -> AppliesTo;
}

impl IoErrorExt for io::Error {
    fn applies_to(&self) -> AppliesTo {
        match self.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset => AppliesTo::Connection,
            _ => AppliesTo::Listener,
        }
    }
}

pub enum AppliesTo {
    Connection,
    Listener,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_error_prints_message_only() {
        let e = DisplayError::from(Error::MissingArgument);
        assert_eq!(format!("{:?}", e), "Missing file or URL");
    }

    #[test]
    fn dropped_connections_do_not_apply_to_listener() {
        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(matches!(reset.applies_to(), AppliesTo::Connection));
        let other = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(other.applies_to(), AppliesTo::Listener));
    }
}
