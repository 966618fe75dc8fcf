//! WebSocket layer: upgrade handling and the per-connection read loop.
//!
//! The upgrade is accepted on any request path; each established
//! connection logs its data frames and never replies.

pub mod connection;
pub mod handler;
