//! Shared application state injected into the Axum upgrade handler.

use std::sync::Arc;

use crate::message_log::MessageLog;

/// Shared application state available to handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Sink every connection writes its received messages to.
    pub message_log: Arc<dyn MessageLog>,
}

impl AppState {
    /// Creates state around the given message sink.
    #[must_use]
    pub fn new(message_log: Arc<dyn MessageLog>) -> Self {
        Self { message_log }
    }
}
