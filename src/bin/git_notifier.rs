//! git-notifier entry point.
//!
//! Usage: `git-notifier <repo_dir> <websocket_host_port_path>`

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use ws_echo_log::config::NotifierConfig;
use ws_echo_log::error::NotifierError;
use ws_echo_log::notifier::Notifier;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
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
            tracing::error!(error = %err, "git-notifier failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), NotifierError> {
    let config = NotifierConfig::from_args(std::env::args())?;
    Notifier::connect(&config).await?.run().await
}
