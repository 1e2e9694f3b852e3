//! Spool-directory queue implementation.
//!
//! One file per in-flight message. Publish writes a temp file and renames
//! it into place so a concurrent receive never observes a partial body;
//! ack deletes the file. Names start with a zero-padded microsecond
//! timestamp so a lexical sort yields oldest-first delivery.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::{MessageBody, QueueConsumer, QueueError, QueuePublisher, RawMessage};
use crate::config::QueueConfig;

const MESSAGE_EXT: &str = "json";

/// File system backed queue.
pub struct FsQueue {
    spool_dir: PathBuf,
    seq: AtomicU64,
}

impl FsQueue {
    /// Create a new spool queue rooted at the configured directory.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            spool_dir: config.spool_dir,
            seq: AtomicU64::new(0),
        }
    }

    /// The spool directory messages live in.
    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    async fn ensure_spool_dir(&self) -> Result<(), QueueError> {
        fs::create_dir_all(&self.spool_dir).await?;
        Ok(())
    }

    fn next_message_id(&self) -> String {
        // Zero-padded so lexical order matches publish order; the
        // sequence number breaks same-microsecond ties within a process.
        format!(
            "{:020}_{:06}_{}.{}",
            Utc::now().timestamp_micros(),
            self.seq.fetch_add(1, Ordering::Relaxed),
            Uuid::new_v4().simple(),
            MESSAGE_EXT
        )
    }

    fn is_valid_message_id(id: &str) -> bool {
        !id.is_empty()
            && !id.contains('/')
            && !id.contains('\\')
            && !id.contains("..")
            && Path::new(id).extension().and_then(|e| e.to_str()) == Some(MESSAGE_EXT)
    }
}

#[async_trait]
impl QueuePublisher for FsQueue {
    async fn publish(&self, body: &str) -> Result<(), QueueError> {
        self.ensure_spool_dir().await?;

        let id = self.next_message_id();
        let final_path = self.spool_dir.join(&id);
        let tmp_path = self.spool_dir.join(format!("{}.tmp", id));

        fs::write(&tmp_path, body.as_bytes())
            .await
            .map_err(|e| QueueError::PublishFailed(format!("{}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &final_path)
            .await
            .map_err(|e| QueueError::PublishFailed(format!("{}: {}", final_path.display(), e)))?;

        debug!("Published message {}", id);
        Ok(())
    }
}

#[async_trait]
impl QueueConsumer for FsQueue {
    async fn receive(&self, max_messages: usize) -> Result<Vec<RawMessage>, QueueError> {
        self.ensure_spool_dir().await?;

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.spool_dir)
            .await
            .map_err(|e| QueueError::ReceiveFailed(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| QueueError::ReceiveFailed(e.to_string()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                if Self::is_valid_message_id(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        names.truncate(max_messages);

        let mut messages = Vec::with_capacity(names.len());
        for name in names {
            let bytes = match fs::read(self.spool_dir.join(&name)).await {
                Ok(bytes) => bytes,
                // Acked by another consumer between listing and reading.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(QueueError::ReceiveFailed(e.to_string())),
            };

            let body = match String::from_utf8(bytes) {
                Ok(text) => MessageBody::Text(text),
                Err(e) => MessageBody::Bytes(e.into_bytes()),
            };

            messages.push(RawMessage { id: name, body });
        }

        debug!("Received {} message(s)", messages.len());
        Ok(messages)
    }

    async fn ack(&self, message_id: &str) -> Result<(), QueueError> {
        if !Self::is_valid_message_id(message_id) {
            return Err(QueueError::UnknownMessage(message_id.to_string()));
        }

        match fs::remove_file(self.spool_dir.join(message_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(QueueError::UnknownMessage(message_id.to_string()))
            }
            Err(e) => Err(QueueError::Io(e)),
        }
    }
}
