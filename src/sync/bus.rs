//! Named broadcast channels between windows of one process.
//!
//! DESIGN
//! ======
//! Each channel name maps to one `tokio::sync::broadcast` sender held in a
//! registry. Posting clones that sender for the duration of one send, so
//! every subscriber (the poster's own window included) sees every message in
//! the same order. Messages travel as encoded JSON text, so a receiver
//! decodes exactly what another producer could have written.
//!
//! ERROR HANDLING
//! ==============
//! Nothing on this path is fatal. Posting with no subscribers is a no-op.
//! A receiver that falls more than `capacity` messages behind logs the gap
//! and continues with the next message; since every message carries the
//! full board, the skipped ones are superseded anyway. Undecodable messages
//! are logged and skipped.

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use super::message::{CodecError, SyncMessage, decode_message, encode_message};
use crate::config::DEFAULT_CHANNEL_CAPACITY;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The receiver has no channel behind it, or the channel is gone.
    #[error("sync channel closed")]
    Closed,
}

/// Something a window can post board updates to and subscribe on.
pub trait SyncChannel: Send + Sync {
    /// Broadcast `message` to every subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Codec`] if the message cannot be encoded.
    fn post(&self, message: &SyncMessage) -> Result<(), SyncError>;

    /// Open a long-lived receiver.
    fn subscribe(&self) -> SyncReceiver;
}

/// Registry of named channels. Clones share the registry.
#[derive(Debug, Clone)]
pub struct LocalBus {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<Arc<str>>>>>,
    capacity: usize,
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl LocalBus {
    /// A bus whose receivers buffer up to `capacity` messages (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { channels: Arc::default(), capacity: capacity.max(1) }
    }

    /// Handle on the channel called `name`, creating it on first use.
    #[must_use]
    pub fn channel(&self, name: &str) -> BusChannel {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = channels
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();
        BusChannel { name: name.to_string(), sender }
    }
}

/// One named channel on a [`LocalBus`].
#[derive(Debug, Clone)]
pub struct BusChannel {
    name: String,
    sender: broadcast::Sender<Arc<str>>,
}

impl BusChannel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send already-encoded text, bypassing the encoder. Receivers decode it
    /// like any other message, so foreign producers can share the channel.
    pub fn post_raw(&self, raw: &str) {
        if self.sender.send(Arc::from(raw)).is_err() {
            debug!(channel = %self.name, "raw sync message posted with no listeners");
        }
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl SyncChannel for BusChannel {
    fn post(&self, message: &SyncMessage) -> Result<(), SyncError> {
        let raw: Arc<str> = encode_message(message)?.into();
        let transient = self.sender.clone();
        match transient.send(raw) {
            Ok(delivered) => debug!(channel = %self.name, delivered, "sync message posted"),
            Err(_) => debug!(channel = %self.name, "sync message posted with no listeners"),
        }
        Ok(())
    }

    fn subscribe(&self) -> SyncReceiver {
        SyncReceiver { channel: self.name.clone(), inner: Some(self.sender.subscribe()) }
    }
}

/// Channel for single-window operation: posts go nowhere and receivers
/// never yield.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disconnected;

impl SyncChannel for Disconnected {
    fn post(&self, message: &SyncMessage) -> Result<(), SyncError> {
        encode_message(message)?;
        Ok(())
    }

    fn subscribe(&self) -> SyncReceiver {
        SyncReceiver { channel: String::new(), inner: None }
    }
}

/// A window's long-lived subscription.
#[derive(Debug)]
pub struct SyncReceiver {
    channel: String,
    inner: Option<broadcast::Receiver<Arc<str>>>,
}

impl SyncReceiver {
    /// Whether this receiver is attached to a channel.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.is_some()
    }

    /// Every message already queued, in arrival order, without waiting.
    pub fn drain(&mut self) -> Vec<SyncMessage> {
        let mut out = Vec::new();
        let Some(rx) = self.inner.as_mut() else {
            return out;
        };
        loop {
            match rx.try_recv() {
                Ok(raw) => {
                    if let Some(message) = decode_or_skip(&self.channel, &raw) {
                        out.push(message);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(channel = %self.channel, skipped, "sync receiver lagged; continuing with newer messages");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        out
    }

    /// Wait for the next decodable message.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Closed`] if the receiver is detached or every
    /// sender is gone.
    pub async fn recv(&mut self) -> Result<SyncMessage, SyncError> {
        let Some(rx) = self.inner.as_mut() else {
            return Err(SyncError::Closed);
        };
        loop {
            match rx.recv().await {
                Ok(raw) => {
                    if let Some(message) = decode_or_skip(&self.channel, &raw) {
                        return Ok(message);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(channel = %self.channel, skipped, "sync receiver lagged; continuing with newer messages");
                }
                Err(RecvError::Closed) => return Err(SyncError::Closed),
            }
        }
    }
}

fn decode_or_skip(channel: &str, raw: &str) -> Option<SyncMessage> {
    match decode_message(raw) {
        Ok(message) => Some(message),
        Err(e) => {
            warn!(channel, error = %e, "skipping undecodable sync message");
            None
        }
    }
}
