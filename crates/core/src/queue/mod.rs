//! Message queue seam between the selector and the enricher.
//!
//! The queue contract is intentionally weak: opaque message bodies,
//! at-least-once delivery, no ordering guarantee for consumers. The
//! enricher is written against that contract, not against the spool
//! implementation shipped here.

mod fs;

pub use fs::FsQueue;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Failed to publish a message.
    #[error("Failed to publish message: {0}")]
    PublishFailed(String),

    /// Failed to receive a batch.
    #[error("Failed to receive messages: {0}")]
    ReceiveFailed(String),

    /// Ack referenced a message the queue does not know.
    #[error("Unknown message: {0}")]
    UnknownMessage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A message as delivered to a consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    /// Delivery identifier, used to ack the message.
    pub id: String,
    /// Opaque body.
    pub body: MessageBody,
}

/// The shapes a delivered body may arrive in.
///
/// Publishers send text, but consumers must tolerate byte payloads and
/// (defensively) bodies a transport has already parsed into a structured
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Text(String),
    Bytes(Vec<u8>),
    Structured(Value),
}

/// Trait for queue publishers.
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Publish one text message.
    async fn publish(&self, body: &str) -> Result<(), QueueError>;
}

/// Trait for queue consumers.
#[async_trait]
pub trait QueueConsumer: Send + Sync {
    /// Receive up to `max_messages` messages without removing them.
    ///
    /// Messages stay in flight until acked; an unacked message is
    /// redelivered by a later receive.
    async fn receive(&self, max_messages: usize) -> Result<Vec<RawMessage>, QueueError>;

    /// Remove a delivered message from the queue.
    async fn ack(&self, message_id: &str) -> Result<(), QueueError>;
}
