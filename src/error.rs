//! Error types for both binaries.
//!
//! [`ServerError`] covers the message logger, [`NotifierError`] the git
//! notifier. Every variant ends the process with exit code 1; only the
//! `Usage` variants are reported on standard output, the rest go through
//! `tracing` to stderr.

use std::net::SocketAddr;

/// Startup and serve-time failures.
///
/// Per-connection transport errors never surface here: they close the
/// affected connection and are logged inside its task.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The required `<port>` argument is missing.
    #[error("Usage: {program} <port>")]
    Usage {
        /// Program name as invoked.
        program: String,
    },

    /// The port argument is not an integer in `1..=65535`.
    #[error("invalid port: {0:?}")]
    InvalidPort(String),

    /// `BIND_HOST` is set but is not an IP address.
    #[error("invalid bind host: {0:?}")]
    InvalidHost(String),

    /// Binding the listening socket failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address the server tried to bind.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed.
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns `true` for the missing-argument case, which is reported on
    /// standard output instead of the diagnostic log.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}

/// Failures of the git notifier.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// The `<repo_dir>` or `<websocket_host_port_path>` argument is missing.
    #[error(
        "Usage: {program} <repo_dir> <websocket_host_port_path>\n    \
         repo_dir - git repository directory to recursively watch for changes\n    \
         websocket_host_port_path - host, port and path of WebSocket server to write changes to.\n    \
         Example: {program} ./my-repo localhost:8080"
    )]
    Usage {
        /// Program name as invoked.
        program: String,
    },

    /// Opening or reading the repository failed.
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// The object directory could not be watched.
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Connecting to or writing to the WebSocket server failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// Encoding the graph as JSON failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for NotifierError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

impl NotifierError {
    /// Returns `true` for the missing-argument case.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn usage_renders_exact_line() {
        let err = ServerError::Usage {
            program: "ws-echo-log".to_string(),
        };
        assert_eq!(err.to_string(), "Usage: ws-echo-log <port>");
        assert!(err.is_usage());
    }

    #[test]
    fn bind_error_names_address() {
        let err = ServerError::Bind {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to bind 127.0.0.1:8080"));
        assert!(!err.is_usage());
    }

    #[test]
    fn notifier_usage_starts_with_invocation_line() {
        let err = NotifierError::Usage {
            program: "git-notifier".to_string(),
        };
        let msg = err.to_string();
        let Some(first) = msg.lines().next() else {
            panic!("empty usage");
        };
        assert_eq!(first, "Usage: git-notifier <repo_dir> <websocket_host_port_path>");
        assert!(msg.ends_with("Example: git-notifier ./my-repo localhost:8080"));
        assert_eq!(msg.lines().count(), 4);
        assert!(err.is_usage());
    }

    #[test]
    fn invalid_port_quotes_input() {
        let err = ServerError::InvalidPort("abc".to_string());
        assert_eq!(err.to_string(), "invalid port: \"abc\"");
    }
}
