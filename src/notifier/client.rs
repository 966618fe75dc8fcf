//! WebSocket client that publishes the object graph.
//!
//! On start the whole graph is sent as one JSON array of elements; after
//! that, each new object is sent as a single node element. Incoming frames
//! are ignored; the notifier stops when the server closes the connection.

use std::collections::HashSet;

use futures_util::{SinkExt, StreamExt};
use git2::Oid;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::graph;
use super::objects::ObjectGraph;
use super::watch::{ObjectWatcher, object_ids_for_path};
use crate::config::NotifierConfig;
use crate::error::NotifierError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A connected notifier.
#[derive(Debug)]
pub struct Notifier {
    graph: ObjectGraph,
    socket: Socket,
    server_url: String,
    /// Ids already published, so repeated watcher events send nothing.
    sent: HashSet<Oid>,
}

impl Notifier {
    /// Opens the repository and connects to the server.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Git`] if the repository cannot be opened and
    /// [`NotifierError::WebSocket`] if the handshake fails.
    pub async fn connect(config: &NotifierConfig) -> Result<Self, NotifierError> {
        let graph = ObjectGraph::open(&config.repo_dir)?;
        tracing::info!(url = %config.server_url, "connecting");
        let (socket, _) = connect_async(config.server_url.as_str()).await?;
        tracing::info!(url = %config.server_url, "connected");

        Ok(Self {
            graph,
            socket,
            server_url: config.server_url.clone(),
            sent: HashSet::new(),
        })
    }

    /// Sends every object in the database as one element array.
    ///
    /// Returns the number of nodes sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read or the send fails.
    pub async fn send_graph(&mut self) -> Result<usize, NotifierError> {
        let nodes = self.graph.nodes()?;
        let json = serde_json::to_string(&graph::elements(&nodes))?;
        tracing::info!(nodes = nodes.len(), "sending object graph");
        self.socket.send(Message::text(json)).await?;

        for node in &nodes {
            if let Ok(oid) = Oid::from_str(&node.id) {
                self.sent.insert(oid);
            }
        }
        Ok(nodes.len())
    }

    /// Sends one object as a node element unless it was already sent.
    ///
    /// Returns `true` if a frame was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be read or the send fails.
    pub async fn send_object(&mut self, oid: Oid) -> Result<bool, NotifierError> {
        if self.sent.contains(&oid) {
            return Ok(false);
        }
        let node = self.graph.node(oid)?;
        let json = serde_json::to_string(&node.element())?;
        self.socket.send(Message::text(json)).await?;
        self.sent.insert(oid);
        tracing::info!(short_id = %node.short_id, object_type = %node.object_type, "sent new object");
        Ok(true)
    }

    /// Publishes the graph, then streams new objects until the server
    /// closes the connection.
    ///
    /// Objects that cannot be read yet are skipped with a warning; a later
    /// event for the same file retries them.
    ///
    /// # Errors
    ///
    /// Returns an error if watching fails, the initial graph cannot be
    /// sent, or the connection breaks.
    pub async fn run(mut self) -> Result<(), NotifierError> {
        // Watch first so nothing written while the graph is sent is missed.
        let mut watcher = ObjectWatcher::new(&self.graph.objects_dir())?;
        self.send_graph().await?;

        loop {
            tokio::select! {
                path = watcher.next_path() => {
                    let Some(path) = path else { break };
                    for oid in object_ids_for_path(&path) {
                        match self.send_object(oid).await {
                            Ok(_) => {}
                            Err(NotifierError::Git(err)) => {
                                tracing::warn!(%oid, error = %err, "skipping unreadable object");
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
                frame = self.socket.next() => {
                    match frame {
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(err)) => return Err(err.into()),
                        Some(Ok(_)) => {}
                    }
                }
            }
        }

        tracing::info!(url = %self.server_url, "connection closed");
        Ok(())
    }
}
