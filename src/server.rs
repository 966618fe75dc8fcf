//! Listener and accept loop.
//!
//! [`Server`] owns the bound socket and the shared [`AppState`]. It is
//! built once in `main` and consumed by [`Server::serve`], which runs until
//! the process is killed.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::message_log::MessageLog;
use crate::ws::handler::ws_handler;

/// A bound, not yet serving, WebSocket server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Binds the listening socket described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address is unavailable.
    pub async fn bind(
        config: &ServerConfig,
        message_log: Arc<dyn MessageLog>,
    ) -> Result<Self, ServerError> {
        let addr = config.listen_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: AppState::new(message_log),
        })
    }

    /// Returns the address the listener is actually bound to.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the socket cannot report its address.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Builds the router: every path upgrades to a WebSocket.
    fn router(state: AppState) -> Router {
        Router::new()
            .fallback(ws_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Accepts connections until the process is killed.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the accept loop fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let app = Self::router(self.state);
        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}
