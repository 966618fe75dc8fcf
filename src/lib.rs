//! # ws-echo-log
//!
//! A minimal WebSocket server that writes every message it receives to
//! standard output as `received: <payload>`. It never replies, routes, or
//! stores anything.
//!
//! The crate also ships `git-notifier`, a WebSocket client that publishes a
//! repository's object graph and every object written afterwards.
//!
//! ## Architecture
//!
//! ```text
//! git-notifier (notifier/)  ── graph JSON ──►  Clients (WebSocket)
//!                                                  │
//!                                                  ├── Server (server.rs)        bind + accept loop
//!                                                  ├── WS Handler (ws/)          upgrade, per-connection read loop
//!                                                  │
//!                                                  └── MessageLog (message_log.rs)   stdout sink
//! ```
//!
//! All connections share one current-thread tokio runtime; lines from
//! different connections are written under the stdout lock and never
//! interleave.

pub mod app_state;
pub mod config;
pub mod error;
pub mod message_log;
pub mod notifier;
pub mod server;
pub mod ws;
