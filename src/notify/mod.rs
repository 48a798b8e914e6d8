//! Toast notifications
//!
//! Components push short user-facing messages into a [`ToastSink`]. The
//! default sink is a broadcast channel that any number of UI surfaces can
//! subscribe to.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    /// Label of an action button, e.g. "Try Again"
    pub action: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            action: None,
            created_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Destination for toasts
pub trait ToastSink: Send + Sync {
    fn push(&self, toast: Toast);
}

/// Broadcast-backed toast sink
#[derive(Clone)]
pub struct ToastChannel {
    tx: broadcast::Sender<Toast>,
}

impl ToastChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new(32)
    }
}

impl ToastSink for ToastChannel {
    fn push(&self, toast: Toast) {
        tracing::info!(level = ?toast.level, message = %toast.message, "Toast");
        if self.tx.send(toast).is_err() {
            tracing::debug!("No toast subscribers");
        }
    }
}
