//! Git object-graph notifier.
//!
//! Publishes a repository's object database as a graph over a WebSocket
//! client connection, then watches `.git/objects` and publishes every new
//! object as it is written.
//!
//! ```text
//! ObjectGraph (objects.rs)  ──►  graph elements (graph.rs)  ──►  Notifier (client.rs)
//!                                                                   ▲
//! ObjectWatcher (watch.rs)  ── new object ids ──────────────────────┘
//! ```

pub mod client;
pub mod graph;
pub mod objects;
pub mod watch;

pub use client::Notifier;
pub use graph::{Edge, Element, Node};
pub use objects::ObjectGraph;
pub use watch::ObjectWatcher;
