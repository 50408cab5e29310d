use crate::traits::ChatTransport;
use nangman_core::chunk::{message_len, split_message};
use nangman_core::types::FormatMode;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("message limit must be greater than zero")]
    InvalidLimit,
    // Raised before anything is sent.
    #[error("part {part} is {len} chars, over the transport limit of {limit}")]
    Oversized { part: usize, len: usize, limit: usize },
    #[error("sending part {part}/{total} failed")]
    Send {
        part: usize,
        total: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Splits outgoing text into transport-safe parts and delivers them in order.
pub struct Notifier {
    transport: Arc<dyn ChatTransport>,
    chat_id: String,
    max_len: usize,
    mode: FormatMode,
}

impl Notifier {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        chat_id: impl Into<String>,
        max_len: usize,
        mode: FormatMode,
    ) -> Self {
        Self {
            transport,
            chat_id: chat_id.into(),
            max_len,
            mode,
        }
    }

    /// The parts `send` would deliver, or why it would refuse to send.
    ///
    /// Whitespace-only parts are dropped since chat APIs reject empty messages.
    pub fn plan(&self, text: &str) -> Result<Vec<String>, TransportError> {
        let limit = self.transport.max_message_len();
        let max_len = self.max_len.min(limit);
        let parts: Vec<String> = split_message(text, max_len)
            .map_err(|_| TransportError::InvalidLimit)?
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();

        for (i, p) in parts.iter().enumerate() {
            let len = message_len(p);
            if len > limit {
                return Err(TransportError::Oversized {
                    part: i + 1,
                    len,
                    limit,
                });
            }
        }
        Ok(parts)
    }

    /// Sends every part in order and stops at the first failure.
    ///
    /// Parts delivered before a failure stay delivered. Returns the number of parts sent.
    pub async fn send(&self, text: &str) -> Result<usize, TransportError> {
        let parts = self.plan(text)?;
        let total = parts.len();

        for (i, p) in parts.iter().enumerate() {
            if let Err(e) = self.transport.send_message(&self.chat_id, p, self.mode).await {
                log::error!("notifier: part {}/{} failed: {e:#}", i + 1, total);
                return Err(TransportError::Send {
                    part: i + 1,
                    total,
                    source: e.into(),
                });
            }
            log::info!("notifier: sent part {}/{}", i + 1, total);
        }
        Ok(total)
    }
}
