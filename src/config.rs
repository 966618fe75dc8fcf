//! Configuration for both binaries, from the command line and environment.
//!
//! The server's port is its only required input and comes from the first
//! positional argument. The bind host may be overridden through `BIND_HOST`
//! (or a `.env` file via `dotenvy`). The notifier takes a repository
//! directory and a WebSocket address.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{NotifierError, ServerError};

/// Host used when `BIND_HOST` is not set.
pub const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Top-level server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind the listener to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    /// Creates a configuration for an explicit address.
    ///
    /// Unlike [`ServerConfig::from_args`], port `0` is accepted here so
    /// callers can let the OS pick an ephemeral port.
    #[must_use]
    pub const fn new(listen_addr: SocketAddr) -> Self {
        Self { listen_addr }
    }

    /// Builds the configuration from process arguments (`argv[0]` first).
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file,
    /// then reads `BIND_HOST`. Arguments after the port are ignored.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Usage`] if no port argument is given.
    /// - [`ServerError::InvalidPort`] if it is not an integer in `1..=65535`.
    /// - [`ServerError::InvalidHost`] if `BIND_HOST` is not an IP address.
    pub fn from_args<I>(args: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = String>,
    {
        dotenvy::dotenv().ok();

        let mut args = args.into_iter();
        let program = program_name(args.next());
        let Some(raw_port) = args.next() else {
            return Err(ServerError::Usage { program });
        };
        let port = parse_port(&raw_port)?;
        let host = parse_host(std::env::var("BIND_HOST").ok())?;

        Ok(Self::new(SocketAddr::new(host, port)))
    }
}

/// Git notifier configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Repository whose object database is published and watched.
    pub repo_dir: PathBuf,
    /// WebSocket URL of the server receiving the graph (e.g. `ws://localhost:8080`).
    pub server_url: String,
}

impl NotifierConfig {
    /// Builds the configuration from process arguments (`argv[0]` first).
    ///
    /// The server address may omit the scheme; `ws://` is assumed.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Usage`] if either argument is missing.
    pub fn from_args<I>(args: I) -> Result<Self, NotifierError>
    where
        I: IntoIterator<Item = String>,
    {
        dotenvy::dotenv().ok();

        let mut args = args.into_iter();
        let program = program_name(args.next());
        let (Some(repo_dir), Some(address)) = (args.next(), args.next()) else {
            return Err(NotifierError::Usage { program });
        };

        Ok(Self {
            repo_dir: PathBuf::from(repo_dir),
            server_url: websocket_url(&address),
        })
    }
}

/// Prefixes `ws://` unless the address already carries a WebSocket scheme.
#[must_use]
pub fn websocket_url(address: &str) -> String {
    let address = address.trim();
    if address.starts_with("ws://") || address.starts_with("wss://") {
        address.to_string()
    } else {
        format!("ws://{address}")
    }
}

/// Extracts the file name from `argv[0]`, falling back to the package name.
fn program_name(argv0: Option<String>) -> String {
    argv0
        .as_deref()
        .and_then(|p| Path::new(p).file_name())
        .and_then(|n| n.to_str())
        .map_or_else(|| env!("CARGO_PKG_NAME").to_string(), str::to_string)
}

/// Parses a port in `1..=65535`.
fn parse_port(raw: &str) -> Result<u16, ServerError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ServerError::InvalidPort(raw.to_string())),
    }
}

/// Parses an optional bind host, defaulting to [`DEFAULT_BIND_HOST`].
fn parse_host(raw: Option<String>) -> Result<IpAddr, ServerError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(DEFAULT_BIND_HOST),
        Some(host) => host
            .parse()
            .map_err(|_| ServerError::InvalidHost(host.to_string())),
    }
}
