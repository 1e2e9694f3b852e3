//! Mock queue for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::queue::{MessageBody, QueueConsumer, QueueError, QueuePublisher, RawMessage};

/// Mock implementation of both queue traits.
///
/// Published bodies are recorded in publish order and also become
/// pending messages, so a selector run can feed an enricher run
/// directly. Messages stay pending until acked, mirroring the
/// at-least-once contract.
#[derive(Debug, Clone, Default)]
pub struct MockQueue {
    published: Arc<RwLock<Vec<String>>>,
    pending: Arc<RwLock<Vec<RawMessage>>>,
    acked: Arc<RwLock<Vec<String>>>,
    seq: Arc<RwLock<usize>>,
    next_publish_error: Arc<RwLock<Option<QueueError>>>,
}

impl MockQueue {
    /// Create a new empty mock queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// All bodies published so far, in publish order.
    pub async fn published_bodies(&self) -> Vec<String> {
        self.published.read().await.clone()
    }

    /// Message ids acked so far.
    pub async fn acked_ids(&self) -> Vec<String> {
        self.acked.read().await.clone()
    }

    /// Number of messages still pending.
    pub async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }

    /// Enqueue an arbitrary message (any body shape) for consumers.
    pub async fn push_raw(&self, message: RawMessage) {
        self.pending.write().await.push(message);
    }

    /// Configure the next publish to fail with the given error.
    pub async fn set_next_publish_error(&self, error: QueueError) {
        *self.next_publish_error.write().await = Some(error);
    }
}

#[async_trait]
impl QueuePublisher for MockQueue {
    async fn publish(&self, body: &str) -> Result<(), QueueError> {
        if let Some(err) = self.next_publish_error.write().await.take() {
            return Err(err);
        }

        let mut seq = self.seq.write().await;
        *seq += 1;
        let id = format!("msg-{}", *seq);
        drop(seq);

        self.published.write().await.push(body.to_string());
        self.pending.write().await.push(RawMessage {
            id,
            body: MessageBody::Text(body.to_string()),
        });
        Ok(())
    }
}

#[async_trait]
impl QueueConsumer for MockQueue {
    async fn receive(&self, max_messages: usize) -> Result<Vec<RawMessage>, QueueError> {
        let pending = self.pending.read().await;
        Ok(pending.iter().take(max_messages).cloned().collect())
    }

    async fn ack(&self, message_id: &str) -> Result<(), QueueError> {
        let mut pending = self.pending.write().await;
        let before = pending.len();
        pending.retain(|m| m.id != message_id);

        if pending.len() == before {
            return Err(QueueError::UnknownMessage(message_id.to_string()));
        }

        self.acked.write().await.push(message_id.to_string());
        Ok(())
    }
}
