//! ws-echo-log server entry point.
//!
//! Usage: `ws-echo-log <port>`

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ws_echo_log::config::ServerConfig;
use ws_echo_log::error::ServerError;
use ws_echo_log::message_log::StdoutLog;
use ws_echo_log::server::Server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only message lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_usage() => {
            println!("{err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %err, "ws-echo-log failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_args(std::env::args())?;

    let server = Server::bind(&config, Arc::new(StdoutLog)).await?;
    tracing::info!(addr = %server.local_addr()?, "server listening");

    server.serve().await
}
