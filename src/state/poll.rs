//! Periodic refresh of an open conversation.
//!
//! DESIGN
//! ======
//! A background task re-issues `getConversation` on a fixed interval and
//! publishes every result on a `watch` channel. There is no jitter, dedup,
//! or back-off: an unchanged conversation is published again, and a failed
//! call is logged and retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::net::Backend;
use crate::net::types::{Conversation, ConversationId};

/// Handle to a running poll. Dropping it stops the task.
pub struct Poller {
    handle: JoinHandle<()>,
    updates: watch::Receiver<Option<Conversation>>,
}

impl Poller {
    /// Receiver for published conversations. `None` means the backend
    /// rejected the read (e.g. the caller lost access).
    #[must_use]
    pub fn updates(&self) -> watch::Receiver<Option<Conversation>> {
        self.updates.clone()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn the poll task. The first read happens immediately.
pub fn spawn_conversation_poll(backend: Arc<dyn Backend>, id: ConversationId, interval: Duration) -> Poller {
    let (tx, updates) = watch::channel(None);
    let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
    info!(conversation = %id, interval_ms, "conversation poll started");

    let handle = tokio::spawn(async move {
        loop {
            match backend.get_conversation(&id).await {
                Ok(conversation) => {
                    if tx.send(Some(conversation)).is_err() {
                        break;
                    }
                }
                Err(e) if e.is_rejection() => {
                    if tx.send(None).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(conversation = %id, error = %e, "conversation poll failed"),
            }
            tokio::time::sleep(interval).await;
        }
    });

    Poller { handle, updates }
}

#[cfg(test)]
#[path = "poll_test.rs"]
mod tests;
